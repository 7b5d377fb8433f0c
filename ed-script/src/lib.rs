mod command;
mod script;

pub use command::Error as CommandError;
pub use script::{Command, CommandList, Error, Script};
