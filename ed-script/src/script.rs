use std::{
    io::{BufRead, BufReader, Read, Split},
    iter::Enumerate,
};
use thiserror::Error;

use crate::command;

/// A streaming reader over an RCS edit script, yielding one command at a
/// time with its payload attached.
pub struct Script<R: Read> {
    reader: Enumerate<Split<BufReader<R>>>,
}

/// An edit command, including its payload if any. Payload lines are stored
/// without their terminating newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        position: usize,
        content: Vec<Vec<u8>>,
    },
    Delete {
        position: usize,
        lines: usize,
    },
}

pub type CommandList = Vec<Command>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("command parsing error on line {line}: {error}")]
    Command {
        #[source]
        error: command::Error,
        line: usize,
    },

    #[error("unexpected end of script: wanted {want} payload line(s) and only got {have}")]
    UnexpectedEof { have: usize, want: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl<R: Read> Script<R> {
    pub fn parse(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader).split(b'\n').enumerate(),
        }
    }

    pub fn into_command_list(self) -> Result<CommandList, Error> {
        self.collect()
    }

    /// Reads the `want` lines of literal text following an add command.
    fn payload(&mut self, want: usize) -> Result<Vec<Vec<u8>>, Error> {
        let content = (&mut self.reader)
            .take(want)
            .map(|(_line, content)| content)
            .collect::<Result<Vec<Vec<u8>>, std::io::Error>>()?;

        if content.len() < want {
            return Err(Error::UnexpectedEof {
                have: content.len(),
                want,
            });
        }

        Ok(content)
    }
}

impl<R: Read> Iterator for Script<R> {
    type Item = Result<Command, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line, raw) = match self.reader.next() {
            Some((line, Ok(raw))) => (line, raw),
            Some((_line, Err(e))) => return Some(Err(e.into())),
            None => return None,
        };

        match command::Command::parse(&raw) {
            Ok(command::Command::Add { position, lines }) => Some(
                self.payload(lines)
                    .map(|content| Command::Add { position, content }),
            ),
            Ok(command::Command::Delete { position, lines }) => {
                Some(Ok(Command::Delete { position, lines }))
            }
            // Annotate the command error with the 1-indexed script line.
            Err(error) => Some(Err(Error::Command {
                error,
                line: line + 1,
            })),
        }
    }
}
