use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{multispace0, multispace1},
    combinator::{map, opt, recognize, value, verify},
    multi::{fold_many0, many0},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};

use crate::types;

mod char;

mod scalar;
use self::scalar::*;

pub(crate) fn file(input: &[u8]) -> IResult<&[u8], types::File> {
    map(
        tuple((
            delimited(multispace0, admin, multispace0),
            many0(terminated(delta, multispace0)),
            terminated(desc, multispace0),
            many0(terminated(delta_text, multispace0)),
        )),
        |(admin, deltas, desc, delta_texts)| types::File {
            admin,
            deltas,
            desc,
            delta_texts,
        },
    )(input)
}

fn admin(input: &[u8]) -> IResult<&[u8], types::Admin> {
    map(
        tuple((
            delimited(tag(b"head"), opt(preceded(multispace1, num)), semi),
            map(
                opt(delimited(
                    tag(b"branch"),
                    opt(preceded(multispace1, num)),
                    semi,
                )),
                Option::flatten,
            ),
            delimited(tag(b"access"), many0(preceded(multispace1, id)), semi),
            delimited(tag(b"symbols"), pairs(sym), semi),
            delimited(tag(b"locks"), pairs(id), semi),
            map(opt(pair(tag(b"strict"), semi)), |strict| strict.is_some()),
            opt(delimited(
                pair(tag(b"comment"), multispace1),
                string,
                semi,
            )),
            opt(delimited(pair(tag(b"expand"), multispace1), string, semi)),
            many0(terminated(new_phrase(b"desc"), multispace0)),
        )),
        |(head, branch, access, symbols, locks, strict, comment, expand, _)| types::Admin {
            head,
            branch,
            access,
            symbols,
            locks,
            strict,
            comment,
            expand,
        },
    )(input)
}

fn delta(input: &[u8]) -> IResult<&[u8], (types::Num, types::Delta)> {
    map(
        tuple((
            terminated(num, multispace1),
            delimited(pair(tag(b"date"), multispace1), date, semi),
            delimited(pair(tag(b"author"), multispace1), id, semi),
            delimited(tag(b"state"), opt(preceded(multispace1, id)), semi),
            delimited(tag(b"branches"), many0(preceded(multispace1, num)), semi),
            delimited(tag(b"next"), opt(preceded(multispace1, num)), semi),
            many0(terminated(new_phrase(b"desc"), multispace0)),
        )),
        |(num, date, author, state, branches, next, _)| {
            (
                num,
                types::Delta {
                    date,
                    author,
                    state,
                    branches,
                    next,
                },
            )
        },
    )(input)
}

fn delta_text(input: &[u8]) -> IResult<&[u8], (types::Num, types::DeltaText)> {
    map(
        tuple((
            num,
            preceded(multispace1, tag(b"log")),
            delimited(multispace1, string, multispace0),
            many0(terminated(new_phrase(b"text"), multispace0)),
            tag(b"text"),
            preceded(multispace1, string),
        )),
        |(num, _, log, _, _, text)| (num, types::DeltaText { log, text }),
    )(input)
}

fn desc(input: &[u8]) -> IResult<&[u8], types::VString> {
    preceded(pair(tag(b"desc"), multispace1), string)(input)
}

/// `sym : num` or `id : num` associations, as listed under `symbols` and
/// `locks`. File order is preserved.
fn pairs<'a, K>(
    key: impl FnMut(&'a [u8]) -> IResult<&'a [u8], K>,
) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], Vec<(K, types::Num)>> {
    fold_many0(
        separated_pair(
            delimited(multispace0, key, multispace0),
            tag(b":"),
            delimited(multispace0, num, multispace0),
        ),
        Vec::new,
        |mut acc, (key, num)| {
            acc.push((key, num));
            acc
        },
    )
}

/// A field terminator: optional whitespace, `;`, optional whitespace.
fn semi(input: &[u8]) -> IResult<&[u8], ()> {
    value((), tuple((multispace0, tag(b";"), multispace0)))(input)
}

/// An unknown trailing field (`id word* ;`), as RCS permits for vendor
/// extensions such as `commitid` or `integrity`. The leading word must be a
/// genuine identifier: a revision number or the keyword opening the next
/// section means the enclosing block has ended.
fn new_phrase<'a>(exclude: &'static [u8]) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], ()> {
    move |input| {
        value(
            (),
            tuple((
                verify(id, move |leader: &types::Id| {
                    leader.as_slice() != exclude
                        && leader.iter().any(|c| !c.is_ascii_digit() && *c != b'.')
                }),
                many0(preceded(multispace0, phrase_word)),
                multispace0,
                tag(b";"),
            )),
        )(input)
    }
}

fn phrase_word(input: &[u8]) -> IResult<&[u8], ()> {
    value(
        (),
        alt((
            recognize(string),
            numlike,
            recognize(id),
            tag(b":"),
        )),
    )(input)
}
