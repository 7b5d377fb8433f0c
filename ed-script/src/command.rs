use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::digit1,
    combinator::{map, map_res},
    sequence::{preceded, separated_pair},
    Finish, IResult,
};
use thiserror::Error;

/// One line of an edit script, before any payload is attached.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Add { position: usize, lines: usize },
    Delete { position: usize, lines: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid edit command: {0}")]
    InvalidCommand(String),

    #[error("missing edit command")]
    NoCommand,
}

impl Command {
    pub(crate) fn parse(line: &[u8]) -> Result<Self, Error> {
        Ok(Finish::finish(command(line))
            .map_err(|e| {
                if e.input.is_empty() {
                    Error::NoCommand
                } else {
                    Error::InvalidCommand(String::from_utf8_lossy(e.input).into_owned())
                }
            })?
            .1)
    }
}

fn command(input: &[u8]) -> IResult<&[u8], Command> {
    alt((
        map(preceded(tag(b"a"), position_lines), |(position, lines)| {
            Command::Add { position, lines }
        }),
        map(preceded(tag(b"d"), position_lines), |(position, lines)| {
            Command::Delete { position, lines }
        }),
    ))(input)
}

fn position_lines(input: &[u8]) -> IResult<&[u8], (usize, usize)> {
    separated_pair(decimal, tag(b" "), decimal)(input)
}

fn decimal(input: &[u8]) -> IResult<&[u8], usize> {
    map_res(digit1, |digits: &[u8]| {
        String::from_utf8_lossy(digits).parse::<usize>()
    })(input)
}
