use std::{cmp::Ordering, fmt::Display, io::Cursor};

use chrono::NaiveDateTime;
use derive_more::{Deref, From, Into};

use crate::Error;

/// A parsed RCS file: the admin block, the deltas, the description, and the
/// delta texts, each in the order they appear on disk.
#[derive(Debug, Clone)]
pub struct File {
    pub admin: Admin,
    pub deltas: Vec<(Num, Delta)>,
    pub desc: VString,
    pub delta_texts: Vec<(Num, DeltaText)>,
}

#[derive(Debug, Clone)]
pub struct Admin {
    pub head: Option<Num>,
    pub branch: Option<Num>,
    pub access: Vec<Id>,
    pub symbols: Vec<(Sym, Num)>,
    pub locks: Vec<(Id, Num)>,
    pub strict: bool,
    pub comment: Option<VString>,
    pub expand: Option<VString>,
}

#[derive(Debug, Clone)]
pub struct Delta {
    pub date: Date,
    pub author: Id,
    pub state: Option<Id>,
    pub branches: Vec<Num>,
    /// The immediate *older* revision on the trunk, in spite of the name.
    pub next: Option<Num>,
}

#[derive(Debug, Clone)]
pub struct DeltaText {
    pub log: VString,
    /// The full revision content for the head revision; an edit script for
    /// every other revision.
    pub text: VString,
}

/// A revision number as written on disk, e.g. `1.2` or `1.2.4.1`.
#[derive(Debug, Clone, PartialEq, Eq, Deref, From, Into, Hash)]
pub struct Num(pub Vec<u8>);

impl Display for Num {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deref, From, Into, Hash)]
pub struct Id(pub Vec<u8>);

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deref, From, Into, Hash)]
pub struct Sym(pub Vec<u8>);

impl Display for Sym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// The payload of an `@`-delimited RCS string: arbitrary bytes, with `@@`
/// already decoded to a single `@`.
#[derive(Debug, Clone, PartialEq, Eq, Deref, From, Into, Hash)]
pub struct VString(pub Vec<u8>);

impl VString {
    pub fn as_cursor(&self) -> Cursor<&Vec<u8>> {
        Cursor::new(&self.0)
    }
}

/// An RCS date: `YY.mm.dd.HH.MM.SS` before 2000, `YYYY.mm.dd.HH.MM.SS` from
/// 2000 onwards.
#[derive(Debug, Clone, PartialEq, Eq, Deref, From, Into, Hash)]
pub struct Date(pub Vec<u8>);

impl Date {
    /// The date with a two-digit year widened to four by prefixing the
    /// century, so that dates from either side of 2000 compare
    /// lexicographically.
    pub fn normalized(&self) -> Vec<u8> {
        if self.0.len() == 17 {
            let mut widened = b"19".to_vec();
            widened.extend_from_slice(&self.0);
            widened
        } else {
            self.0.clone()
        }
    }

    pub fn cmp_normalized(&self, other: &Date) -> Ordering {
        self.normalized().cmp(&other.normalized())
    }

    /// Renders the date as ISO-8601 `YYYY-MM-DDThh:mm:ssZ`.
    pub fn as_iso8601(&self) -> Result<String, Error> {
        let normalized = self.normalized();
        let raw = std::str::from_utf8(&normalized)?;
        let date = NaiveDateTime::parse_from_str(raw, "%Y.%m.%d.%H.%M.%S")
            .map_err(|_| Error::BadDate(raw.to_string()))?;
        Ok(date.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}
