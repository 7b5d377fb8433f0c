use std::{convert::TryFrom, fmt::Display, num::ParseIntError, str::FromStr};

use itertools::Itertools;

use crate::{types::Num, Error};

/// A revision number split into its numeric components.
///
/// The derived ordering compares component-wise numerically, so `1.9` sorts
/// before `1.10` even though it does not lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rev(Vec<u64>);

impl Rev {
    /// Trunk revisions have exactly two components; anything deeper lives on
    /// a branch.
    pub fn is_trunk(&self) -> bool {
        self.0.len() == 2
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl FromStr for Rev {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            s.split('.')
                .map(|component| component.parse::<u64>())
                .collect::<Result<Vec<u64>, ParseIntError>>()?,
        ))
    }
}

impl TryFrom<&Num> for Rev {
    type Error = Error;

    fn try_from(num: &Num) -> Result<Self, Self::Error> {
        Self::from_str(std::str::from_utf8(num)?)
    }
}

impl Display for Rev {
    #[allow(unstable_name_collisions)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .map(|component| component.to_string())
                .intersperse(String::from("."))
                .collect::<String>()
        )
    }
}
