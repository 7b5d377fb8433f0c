use rcs_file::{Date, Id, Num, Sym, VString};

use crate::Error;

/// The default grep format: revision, line number, line text.
pub const DEFAULT_FORMAT: &str = "rlL";

/// One directive of a grep format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Revision,
    LineNumber,
    Line,
    Author,
    Date,
    IsoDate,
    Tags,
    Filename,
    Message,
}

pub(crate) fn parse(format: &str) -> Result<Vec<Directive>, Error> {
    format
        .chars()
        .map(|directive| match directive {
            'r' => Ok(Directive::Revision),
            'l' => Ok(Directive::LineNumber),
            'L' => Ok(Directive::Line),
            'a' => Ok(Directive::Author),
            'd' => Ok(Directive::Date),
            'D' => Ok(Directive::IsoDate),
            't' => Ok(Directive::Tags),
            'f' => Ok(Directive::Filename),
            'm' => Ok(Directive::Message),
            unknown => Err(Error::BadFormat(unknown)),
        })
        .collect()
}

/// One cell of a formatted grep result, tagged with the directive that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Revision(Num),
    LineNumber(usize),
    Line(Vec<u8>),
    Author(Id),
    /// The date exactly as written in the file.
    Date(Date),
    /// The date as `YYYY-MM-DDThh:mm:ssZ`.
    IsoDate(String),
    Tags(Vec<Sym>),
    /// The path the model was opened from, or `?` for models built from a
    /// buffer.
    Filename(String),
    Message(VString),
}
