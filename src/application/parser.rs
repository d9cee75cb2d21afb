//! Line tokenizer and argument converters shared by both command vocabularies.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::error::{Arity, ParseError};
use crate::domain::Section;

static NETWORK_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{1,6}$").unwrap());
static VERTEX_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]{1,6}$").unwrap());
static FOREST_NODE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,16}$").unwrap());
static SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]{1,6})(\d+)([a-z]{1,6})$").unwrap());

/// A command name of one vocabulary.
///
/// Implementors derive `FromStr` and `AsRefStr` from strum so the name on the
/// command line maps onto the variant.
pub trait CommandKind: FromStr + AsRef<str> + Copy {
    fn arity(self) -> Arity;
}

/// Identifier families with their patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// `[A-Z]{1,6}`
    Network,
    /// `[a-z]{1,6}`
    Vertex,
    /// `[A-Za-z0-9_]{1,16}`
    ForestNode,
}

impl IdKind {
    fn name(self) -> &'static str {
        match self {
            IdKind::Network => "network",
            IdKind::Vertex => "vertex",
            IdKind::ForestNode => "node",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            IdKind::Network => &*NETWORK_ID,
            IdKind::Vertex => &*VERTEX_ID,
            IdKind::ForestNode => &*FOREST_NODE_ID,
        }
    }
}

/// Splits a line into its command kind and argument tokens.
///
/// Blank lines, unknown names and wrong argument counts are rejected.
pub fn parse_line<K: CommandKind>(line: &str) -> Result<(K, Vec<&str>), ParseError> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next().ok_or(ParseError::Empty)?;
    let kind = K::from_str(name).map_err(|_| ParseError::UnknownCommand(name.to_string()))?;
    let args: Vec<&str> = tokens.collect();

    let expected = kind.arity();
    if !expected.accepts(args.len()) {
        return Err(ParseError::ArgumentCount {
            command: kind.as_ref().to_string(),
            expected,
            actual: args.len(),
        });
    }
    trace!("parse_line: {} {:?}", name, args);
    Ok((kind, args))
}

pub fn parse_identifier(kind: IdKind, token: &str) -> Result<String, ParseError> {
    if kind.pattern().is_match(token) {
        Ok(token.to_string())
    } else {
        Err(ParseError::MalformedIdentifier {
            kind: kind.name(),
            value: token.to_string(),
        })
    }
}

pub fn parse_number<T: FromStr>(token: &str) -> Result<T, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::NotANumber(token.to_string()))
}

/// Largest capacity a section may carry: a signed 32-bit integer.
pub const MAX_CAPACITY: u32 = i32::MAX as u32;

/// Parses `<from><capacity><to>`, e.g. `ab12cd`.
pub fn parse_section(token: &str) -> Result<Section, ParseError> {
    let caps = SECTION
        .captures(token)
        .ok_or_else(|| ParseError::MalformedSection(token.to_string()))?;
    let capacity: u32 = parse_number(&caps[2])?;
    if capacity > MAX_CAPACITY {
        return Err(ParseError::NotANumber(caps[2].to_string()));
    }
    Ok(Section::new(&caps[1], capacity, &caps[3]))
}

/// Parses `;`-separated sections. Empty entries (leading, trailing or doubled `;`) are malformed.
pub fn parse_sections(token: &str) -> Result<Vec<Section>, ParseError> {
    token.split(';').map(parse_section).collect()
}
