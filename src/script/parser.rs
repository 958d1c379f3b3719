//! nom parser for the script definition language
//!
//! ```text
//! k_france = {
//!     title = "KING"          # comment
//!     male_names = { Louis "Hugues Capet" }
//!     allow = { age >= 16 }
//! }
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{char, multispace1, not_line_ending},
    combinator::{cut, map, recognize, value},
    error::{ErrorKind, ParseError},
    multi::many0,
    sequence::{delimited, preceded, terminated},
    IResult, Parser,
};

use super::tree::{Node, Operator, Tree, Value};

/// Parser error carrying the input position it failed at
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError<'a> {
    pub input: &'a str,
    pub message: String,
}

impl<'a> ParseError<&'a str> for SyntaxError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self {
            input,
            message: format!("unexpected input ({:?})", kind),
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: &'a str, c: char) -> Self {
        Self {
            input,
            message: format!("expected '{}'", c),
        }
    }
}

/// Parse failure resolved to a line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub line: usize,
    pub message: String,
}

type PResult<'a, O> = IResult<&'a str, O, SyntaxError<'a>>;

enum Entry {
    Pair(Node),
    Bare(Value),
}

/// Parse a whole script document into a tree
pub fn parse_str(source: &str) -> Result<Tree, ParseFailure> {
    match document(source) {
        Ok(("", nodes)) => Ok(Tree::from_nodes(nodes)),
        Ok((rest, _)) => Err(failure(source, rest, "unexpected input")),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(failure(source, e.input, &e.message))
        }
        Err(nom::Err::Incomplete(_)) => Err(failure(source, "", "unexpected end of input")),
    }
}

fn failure(source: &str, rest: &str, message: &str) -> ParseFailure {
    let offset = source.len() - rest.len();
    let line = source[..offset].matches('\n').count() + 1;
    let near: String = rest.chars().take(24).collect();
    let message = if near.is_empty() {
        message.to_string()
    } else {
        format!("{} near '{}'", message, near.trim_end())
    };
    ParseFailure { line, message }
}

fn document(input: &str) -> PResult<'_, Vec<Node>> {
    preceded(ws, many0(terminated(pair, ws))).parse(input)
}

/// Whitespace and `#` comments
fn ws(input: &str) -> PResult<'_, ()> {
    value(
        (),
        many0(alt((
            multispace1,
            recognize(preceded(char('#'), not_line_ending)),
        ))),
    )
    .parse(input)
}

fn is_bare_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '{' | '}' | '=' | '<' | '>' | '!' | '?' | '"' | '#')
}

fn token(input: &str) -> PResult<'_, &str> {
    alt((
        delimited(char('"'), take_till(|c: char| c == '"'), cut(char('"'))),
        take_while1(is_bare_char),
    ))
    .parse(input)
}

fn operator(input: &str) -> PResult<'_, Operator> {
    alt((
        value(Operator::EqEq, tag("==")),
        value(Operator::Ne, tag("!=")),
        value(Operator::Le, tag("<=")),
        value(Operator::Ge, tag(">=")),
        value(Operator::QEq, tag("?=")),
        value(Operator::Eq, tag("=")),
        value(Operator::Lt, tag("<")),
        value(Operator::Gt, tag(">")),
    ))
    .parse(input)
}

fn pair(input: &str) -> PResult<'_, Node> {
    let (input, name) = token(input)?;
    let (input, _) = ws(input)?;
    let (input, op) = operator(input)?;
    let (input, _) = ws(input)?;
    let (input, value) = cut(script_value).parse(input)?;
    Ok((
        input,
        Node {
            name: name.to_string(),
            op,
            value,
        },
    ))
}

fn script_value(input: &str) -> PResult<'_, Value> {
    alt((block, map(token, |t: &str| Value::Scalar(t.to_string())))).parse(input)
}

fn entry(input: &str) -> PResult<'_, Entry> {
    alt((map(pair, Entry::Pair), map(script_value, Entry::Bare))).parse(input)
}

fn block(input: &str) -> PResult<'_, Value> {
    let (rest, _) = char('{').parse(input)?;
    let (rest, _) = ws(rest)?;
    let (rest, entries) = many0(terminated(entry, ws)).parse(rest)?;
    let (rest, _) = cut(char('}')).parse(rest)?;

    let value = classify(entries).map_err(|message| {
        nom::Err::Failure(SyntaxError {
            input,
            message: message.to_string(),
        })
    })?;
    Ok((rest, value))
}

/// Named entries make a tree, anonymous ones a list. `{}` is an empty tree.
fn classify(entries: Vec<Entry>) -> Result<Value, &'static str> {
    let named = entries.iter().filter(|e| matches!(e, Entry::Pair(_))).count();
    if named == entries.len() {
        let nodes = entries
            .into_iter()
            .filter_map(|e| match e {
                Entry::Pair(node) => Some(node),
                Entry::Bare(_) => None,
            })
            .collect();
        Ok(Value::Tree(Tree::from_nodes(nodes)))
    } else if named == 0 {
        let items = entries
            .into_iter()
            .filter_map(|e| match e {
                Entry::Bare(value) => Some(value),
                Entry::Pair(_) => None,
            })
            .collect();
        Ok(Value::List(items))
    } else {
        Err("block mixes named and anonymous entries")
    }
}
