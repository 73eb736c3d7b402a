use nom::{
    IResult,
    branch::alt,
    bytes::complete::{escaped_transform, is_not, take_while1},
    character::complete::char,
    combinator::{all_consuming, map, opt, value},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair},
};
use std::fmt;
use std::str::FromStr;

use crate::types::{TraversalError, TraversalResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

impl Path {
    /// Parse a complete path string, rejecting trailing input.
    pub fn parse(input: &str) -> TraversalResult<Path> {
        match all_consuming(parse_path)(input) {
            Ok((_, path)) => Ok(path),
            Err(_) => Err(TraversalError::InvalidPath(input.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for Path {
    type Err = TraversalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Path { segments }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "'{}'", key),
            PathSegment::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
                PathSegment::Key(key) if needs_quoting(key) => {
                    write!(f, "[\"{}\"]", key.replace('\\', "\\\\").replace('"', "\\\""))?
                }
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
            }
        }
        Ok(())
    }
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty() || !key.chars().all(is_key_char)
}

/// Returns the index a key denotes when used against an array.
///
/// Only canonical decimal forms count: `"2"` is an index, `"02"` and `"+2"` are not.
pub(crate) fn canonical_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

// Anything except the dot and bracket delimiters
fn is_key_char(c: char) -> bool {
    c != '.' && c != '[' && c != ']'
}

// Parse a bare key name
fn parse_key(input: &str) -> IResult<&str, PathSegment> {
    map(take_while1(is_key_char), |s: &str| {
        PathSegment::Key(s.to_string())
    })(input)
}

fn parse_double_quoted(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(
                is_not("\\\""),
                '\\',
                alt((value("\\", char('\\')), value("\"", char('"')))),
            )),
            Option::unwrap_or_default,
        ),
        char('"'),
    )(input)
}

fn parse_single_quoted(input: &str) -> IResult<&str, String> {
    delimited(
        char('\''),
        map(
            opt(escaped_transform(
                is_not("\\'"),
                '\\',
                alt((value("\\", char('\\')), value("'", char('\'')))),
            )),
            Option::unwrap_or_default,
        ),
        char('\''),
    )(input)
}

// Unquoted bracket content is an index when canonical, a key otherwise
fn bare_bracket_segment(content: &str) -> PathSegment {
    match canonical_index(content) {
        Some(idx) => PathSegment::Index(idx),
        None => PathSegment::Key(content.to_string()),
    }
}

// Parse a bracket like [0], ["a.b"], ['a.b'] or [name]
fn parse_bracket(input: &str) -> IResult<&str, PathSegment> {
    delimited(
        char('['),
        alt((
            map(alt((parse_double_quoted, parse_single_quoted)), PathSegment::Key),
            map(is_not("]"), bare_bracket_segment),
        )),
        char(']'),
    )(input)
}

// Parse key followed by optional brackets, or a run of brackets
fn parse_segment_group(input: &str) -> IResult<&str, Vec<PathSegment>> {
    alt((
        map(pair(parse_key, many0(parse_bracket)), |(key, brackets)| {
            let mut segments = vec![key];
            segments.extend(brackets);
            segments
        }),
        many1(parse_bracket),
    ))(input)
}

// Parse a complete path: segment groups separated by dots
pub fn parse_path(input: &str) -> IResult<&str, Path> {
    map(
        separated_list1(char('.'), parse_segment_group),
        |segment_groups| Path {
            segments: segment_groups.into_iter().flatten().collect(),
        },
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> PathSegment {
        PathSegment::Key(s.to_string())
    }

    #[test]
    fn test_parse_simple_path() {
        let (_, path) = parse_path("patient.name").unwrap();
        assert_eq!(path.segments, vec![key("patient"), key("name")]);
    }

    #[test]
    fn test_parse_path_with_index() {
        let (_, path) = parse_path("items[0].name").unwrap();
        assert_eq!(
            path.segments,
            vec![key("items"), PathSegment::Index(0), key("name")]
        );
    }

    #[test]
    fn test_parse_leading_and_chained_brackets() {
        let path = Path::parse("[1][2].x").unwrap();
        assert_eq!(
            path.segments,
            vec![PathSegment::Index(1), PathSegment::Index(2), key("x")]
        );
    }

    #[test]
    fn test_parse_quoted_keys() {
        let path = Path::parse("a[\"b.c\"]['d]e']").unwrap();
        assert_eq!(path.segments, vec![key("a"), key("b.c"), key("d]e")]);

        let path = Path::parse(r#"a["say \"hi\""]"#).unwrap();
        assert_eq!(path.segments, vec![key("a"), key("say \"hi\"")]);

        let path = Path::parse("a[\"\"]").unwrap();
        assert_eq!(path.segments, vec![key("a"), key("")]);
    }

    #[test]
    fn test_bare_bracket_content() {
        let path = Path::parse("a[name][07]").unwrap();
        assert_eq!(path.segments, vec![key("a"), key("name"), key("07")]);
    }

    #[test]
    fn test_rejects_malformed_paths() {
        for input in ["", "a..b", "a.", ".a", "a[0", "a]", "a[]", "a[0]b"] {
            assert!(Path::parse(input).is_err(), "{input:?} should not parse");
        }
    }

    #[test]
    fn test_canonical_index() {
        assert_eq!(canonical_index("0"), Some(0));
        assert_eq!(canonical_index("42"), Some(42));
        assert_eq!(canonical_index("042"), None);
        assert_eq!(canonical_index("-1"), None);
        assert_eq!(canonical_index("length"), None);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let path = Path::from(vec![
            key("a"),
            key("b.c"),
            PathSegment::Index(3),
            key("d"),
        ]);
        assert_eq!(path.to_string(), "a[\"b.c\"][3].d");
        assert_eq!(Path::parse(&path.to_string()).unwrap(), path);
    }
}
