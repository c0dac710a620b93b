//! Splitting raw equation lines into expression sides and directives.

use std::fmt;

use frees_core::{Expr, ParseError};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_till1},
    character::complete::{char, multispace0, one_of},
    combinator::{all_consuming, eof, not, opt, recognize, rest},
    multi::many0,
    sequence::{delimited, preceded, terminated},
};
use thiserror::Error;

use crate::directive::{Condition, Directive, DirectiveError, parse_directives};

const COMMENT: char = '#';
const DIRECTIVE: char = '!';
const SUPPRESS: char = ';';
const EQUALS: char = '=';

/// One line of an equation system, parsed once before solving.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Blank, or only a comment.
    Blank,

    /// Text without an `=`; never an equation, never a warning.
    Text,

    /// An `lhs = rhs` equation with its directives.
    Equation(Equation),

    /// Looks like an equation but cannot be parsed.
    Malformed(LineError),
}

/// Which side of an equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Errors that make a line malformed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LineError {
    #[error("{side} side: {source}")]
    Expression {
        side: Side,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error("cannot split line at column {column}")]
    Syntax { column: usize },
}

/// A parsed `lhs = rhs` equation.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
    pub directives: Vec<Directive>,
}

impl Equation {
    #[must_use]
    pub fn side(&self, side: Side) -> &Expr {
        match side {
            Side::Left => &self.lhs,
            Side::Right => &self.rhs,
        }
    }

    /// Returns true if the solved variable should be hidden from the report.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.directives.contains(&Directive::Suppress)
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.directives.iter().filter_map(|directive| match directive {
            Directive::If(condition) => Some(condition),
            _ => None,
        })
    }
}

/// Parses one raw line.
///
/// The line is read as `lhs ("=" rhs)? ";"? ("!" directives ";"?)? ("#" comment)?`,
/// with quoted text opaque to every marker. The equation splits on its first
/// `=`, and a `;` that ends the equation or the directives suppresses the
/// line's variable.
#[must_use]
pub fn parse_line(raw: &str) -> Line {
    let sections = match all_consuming(split_sections).parse(raw) {
        Ok((_, sections)) => sections,
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            return Line::Malformed(syntax_error(raw, e.input));
        }
        Err(nom::Err::Incomplete(_)) => return Line::Malformed(syntax_error(raw, "")),
    };

    let Some(rhs) = sections.rhs else {
        let empty =
            sections.lhs.trim().is_empty() && sections.directives.is_none() && !sections.suppressed;
        return if empty { Line::Blank } else { Line::Text };
    };

    match parse_equation(sections.lhs, rhs, sections.directives.unwrap_or_default()) {
        Ok(mut equation) => {
            if sections.suppressed {
                equation.directives.push(Directive::Suppress);
            }
            Line::Equation(equation)
        }
        Err(error) => Line::Malformed(error),
    }
}

fn parse_equation(lhs: &str, rhs: &str, directives: &str) -> Result<Equation, LineError> {
    let expression = |text: &str, side| {
        Expr::parse(text).map_err(|source| LineError::Expression { side, source })
    };

    Ok(Equation {
        lhs: expression(lhs, Side::Left)?,
        rhs: expression(rhs, Side::Right)?,
        directives: parse_directives(directives)?,
    })
}

fn syntax_error(raw: &str, rest: &str) -> LineError {
    let consumed = raw.len() - rest.len();
    LineError::Syntax {
        column: raw[..consumed].chars().count() + 1,
    }
}

type PResult<'a, O> = IResult<&'a str, O>;

/// The marked-up parts of a line, before any expression is parsed.
struct Sections<'a> {
    lhs: &'a str,
    rhs: Option<&'a str>,

    /// Directive text including its leading `!`.
    directives: Option<&'a str>,
    suppressed: bool,
}

fn split_sections(input: &str) -> PResult<'_, Sections<'_>> {
    let (input, lhs) = segment("=!#", "!#").parse(input)?;
    let (input, rhs) = opt(preceded(char(EQUALS), segment("!#", "!#"))).parse(input)?;
    let (input, body_marker) = opt(suppress).parse(input)?;
    let (input, directives) =
        opt(recognize((char(DIRECTIVE), segment("#", "#")))).parse(input)?;
    let (input, tail_marker) = opt(suppress).parse(input)?;
    let (input, _) = opt((char(COMMENT), rest)).parse(input)?;

    let sections = Sections {
        lhs,
        rhs,
        directives,
        suppressed: body_marker.is_some() || tail_marker.is_some(),
    };
    Ok((input, sections))
}

/// Source text up to the first unquoted character in `stop`, or up to a `;`
/// followed only by whitespace and then the end of input or one of `ends`.
fn segment<'a>(
    stop: &'static str,
    ends: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    recognize(many0(alt((
        quoted,
        take_till1(move |c: char| stop.contains(c) || matches!(c, '"' | '\'' | SUPPRESS)),
        terminated(tag(";"), not(section_end(ends))),
    ))))
}

/// A quoted string. An unclosed quote runs to the end of the line.
fn quoted(input: &str) -> PResult<'_, &str> {
    recognize(alt((
        (char('"'), take_till(|c: char| c == '"'), opt(char('"'))),
        (char('\''), take_till(|c: char| c == '\''), opt(char('\''))),
    )))
    .parse(input)
}

fn section_end<'a>(
    ends: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    preceded(multispace0, alt((eof, recognize(one_of(ends)))))
}

fn suppress(input: &str) -> PResult<'_, char> {
    delimited(multispace0, char(SUPPRESS), multispace0).parse(input)
}
