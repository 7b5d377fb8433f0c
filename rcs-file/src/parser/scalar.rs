use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1, take_while1},
    combinator::{map, value, verify},
    multi::fold_many0,
    sequence::delimited,
    IResult,
};

use super::char::*;
use crate::types;

pub(super) fn id(input: &[u8]) -> IResult<&[u8], types::Id> {
    map(take_while1(|c| is_idchar(c) || c == b'.'), |bytes| {
        types::Id(Vec::from(bytes))
    })(input)
}

pub(super) fn sym(input: &[u8]) -> IResult<&[u8], types::Sym> {
    map(take_while1(is_idchar), |bytes| types::Sym(Vec::from(bytes)))(input)
}

pub(super) fn numlike(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(is_numchar)(input)
}

/// Digit runs separated by single dots; no leading, trailing, or doubled
/// dots.
pub(super) fn well_formed_num(bytes: &[u8]) -> bool {
    bytes.first().map_or(false, u8::is_ascii_digit)
        && bytes.last().map_or(false, u8::is_ascii_digit)
        && !bytes.windows(2).any(|pair| pair == b"..")
}

pub(super) fn num(input: &[u8]) -> IResult<&[u8], types::Num> {
    map(verify(numlike, |bytes: &[u8]| well_formed_num(bytes)), |bytes| {
        types::Num(Vec::from(bytes))
    })(input)
}

pub(super) fn date(input: &[u8]) -> IResult<&[u8], types::Date> {
    map(verify(numlike, |bytes: &[u8]| well_formed_num(bytes)), |bytes| {
        types::Date(Vec::from(bytes))
    })(input)
}

pub(super) fn string_literal(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_till1(|c| c == b'@')(input)
}

pub(super) fn string_escape(input: &[u8]) -> IResult<&[u8], &[u8]> {
    value(&b"@"[..], tag(b"@@"))(input)
}

pub(super) fn string(input: &[u8]) -> IResult<&[u8], types::VString> {
    map(
        delimited(
            tag(b"@"),
            fold_many0(
                alt((string_literal, string_escape)),
                Vec::new,
                |mut v, fragment| {
                    v.extend_from_slice(fragment);
                    v
                },
            ),
            tag(b"@"),
        ),
        types::VString,
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id() {
        assert_eq!(id(b"adam ").unwrap().1 .0, b"adam");
        assert_eq!(id(b".login").unwrap().1 .0, b".login");
        assert_eq!(id(b"j.doe:1.1").unwrap().1 .0, b"j.doe");
        assert!(id(b";").is_err());
    }

    #[test]
    fn test_num() {
        assert_eq!(num(b"1.2.4.1;").unwrap().1 .0, b"1.2.4.1");
        assert!(num(b".1").is_err());
        assert!(num(b"1.").is_err());
        assert!(num(b"1..2").is_err());
        assert!(num(b"x").is_err());
    }

    #[test]
    fn test_string() {
        assert_eq!(string(b"@@").unwrap().1 .0, b"");
        assert_eq!(string(b"@foo bar@").unwrap().1 .0, b"foo bar");
        assert_eq!(string(b"@foo@@bar@").unwrap().1 .0, b"foo@bar");
        assert_eq!(string(b"@a;b\nc@").unwrap().1 .0, b"a;b\nc");
        assert!(string(b"@unterminated").is_err());
    }
}
