use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::take_till1,
    character::complete::char,
    combinator::{all_consuming, map},
    multi::{fold_many0, separated_list1},
    sequence::preceded,
    IResult, Parser,
};
use nom_language::error::VerboseError;
use serde::{Deserialize, Serialize};

use crate::error::Error;

type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// The raw path supplied to an operation.
///
/// Mirrors the three accepted call-site shapes: no path at all (the root
/// value itself), a delimited string path, or a bare integer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPath<'a> {
    /// No path: the operation addresses the root value.
    Root,
    /// A delimited string path, e.g. `"a.b.c"`.
    Text(&'a str),
    /// A bare index, equivalent to a single-token path.
    Index(usize),
}

impl RawPath<'_> {
    /// Returns true if this path denotes the root value.
    pub fn is_root(&self) -> bool {
        matches!(self, RawPath::Root)
    }
}

impl<'a> From<&'a str> for RawPath<'a> {
    fn from(s: &'a str) -> Self {
        RawPath::Text(s)
    }
}

impl<'a> From<Option<&'a str>> for RawPath<'a> {
    fn from(s: Option<&'a str>) -> Self {
        match s {
            Some(s) => RawPath::Text(s),
            None => RawPath::Root,
        }
    }
}

impl From<usize> for RawPath<'_> {
    fn from(i: usize) -> Self {
        RawPath::Index(i)
    }
}

/// One path segment after delimiter splitting and escape resolution.
///
/// Tokens produced from a string path are always `Key`s; a `Key` that
/// parses as an unsigned integer indexes into sequences, and an `Index`
/// addresses a mapping by its decimal string form. See [`Token::to_key`]
/// and [`Token::to_index`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Key(String),
    Index(usize),
}

impl Token {
    /// The mapping key this token addresses.
    pub fn to_key(&self) -> String {
        match self {
            Token::Key(k) => k.clone(),
            Token::Index(i) => i.to_string(),
        }
    }

    /// The sequence index this token addresses, if it coerces to one.
    pub fn to_index(&self) -> Option<usize> {
        match self {
            Token::Key(k) => k.parse().ok(),
            Token::Index(i) => Some(*i),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Key(k) => f.write_str(k),
            Token::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::Key(s.to_string())
    }
}

impl From<usize> for Token {
    fn from(i: usize) -> Self {
        Token::Index(i)
    }
}

/// The delimiter between keys in a string path.
#[derive(Debug, Clone, Copy, Default)]
pub enum Separator {
    #[default]
    Dot,
    Slash,
    Custom(char),
}

impl Separator {
    pub fn as_char(&self) -> char {
        match self {
            Separator::Dot => '.',
            Separator::Slash => '/',
            Separator::Custom(c) => *c,
        }
    }
}

/// Splits a raw path into its ordered token sequence.
///
/// A separator preceded by a backslash is taken literally (the backslash
/// is removed); a backslash not followed by the separator is an ordinary
/// character. The empty string is a single empty-string token, which is
/// distinct from [`RawPath::Root`].
///
/// ## Example
///
/// ```rust
/// use dotwalk::{tokenize, RawPath, Separator, Token};
///
/// let tokens = tokenize("a\\.b.c", Separator::Dot).unwrap();
/// assert_eq!(tokens, vec![Token::Key("a.b".into()), Token::Key("c".into())]);
///
/// assert!(tokenize(RawPath::Root, Separator::Dot).unwrap().is_empty());
/// ```
pub fn tokenize<'a>(raw: impl Into<RawPath<'a>>, separator: Separator) -> Result<Vec<Token>, Error> {
    match raw.into() {
        RawPath::Root => Ok(Vec::new()),
        RawPath::Index(i) => Ok(vec![Token::Index(i)]),
        RawPath::Text(path) => {
            let sep = separator.as_char();
            let result: Res<'_, Vec<String>> = all_consuming(segments(sep)).parse(path);
            match result {
                Ok((_, keys)) => Ok(keys.into_iter().map(Token::Key).collect()),
                Err(err) => Err(Error::InvalidArgument(format!("path syntax: {}", err))),
            }
        }
    }
}

fn segments<'a>(sep: char) -> impl Parser<&'a str, Output = Vec<String>, Error = VerboseError<&'a str>> {
    separated_list1(char(sep), segment(sep))
}

/// One segment: a fold over escaped separators, plain runs, and literal
/// backslashes. Matching the empty string is deliberate so that adjacent
/// or trailing separators yield empty-string keys.
fn segment<'a>(sep: char) -> impl Parser<&'a str, Output = String, Error = VerboseError<&'a str>> {
    fold_many0(
        alt((
            map(preceded(char('\\'), char(sep)), |c: char| c.to_string()),
            map(
                take_till1(move |c: char| c == sep || c == '\\'),
                |s: &str| s.to_string(),
            ),
            map(char('\\'), |c: char| c.to_string()),
        )),
        String::new,
        |mut acc: String, piece: String| {
            acc.push_str(&piece);
            acc
        },
    )
}
