use nom::Finish;

mod error;
mod parser;
mod rev;
mod types;

pub use error::Error;
pub use rev::Rev;
pub use types::*;

/// Parses a full RCS file.
pub fn parse(input: &[u8]) -> Result<File, Error> {
    Ok(Finish::finish(parser::file(input))
        .map_err(|e| Error::malformed(e.input, e.code))?
        .1)
}
