use std::{num::ParseIntError, str::Utf8Error};

use nom::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed RCS input near {location:?}: {kind:?}")]
    MalformedInput { location: String, kind: ErrorKind },

    #[error("malformed RCS date {0:?}")]
    BadDate(String),

    #[error(transparent)]
    ParseInt(#[from] ParseIntError),

    #[error(transparent)]
    ParseUtf8(#[from] Utf8Error),
}

impl Error {
    pub(crate) fn malformed(input: &[u8], kind: ErrorKind) -> Self {
        // The residual input runs to the end of the file; a short prefix is
        // enough to locate the offending token.
        let location = String::from_utf8_lossy(&input[..input.len().min(64)]).into_owned();
        Error::MalformedInput { location, kind }
    }
}
