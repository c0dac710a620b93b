//! Directives: the `!keyword args...` annotations that follow an equation.
//!
//! The directive text is first split into `(keyword, tokens)` groups by a
//! small grammar, then each group is checked against the keyword's arity.
//! Tokens are separated by whitespace, so operands must not contain spaces.

use std::fmt;

use frees_core::{Expr, ParseError, Scope, Toolkit, evaluate};
use nom::{
    IResult, Parser,
    bytes::complete::take_till1,
    character::complete::{alpha1, char, multispace0, multispace1},
    combinator::all_consuming,
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
};
use thiserror::Error;

use crate::comparison::{ComparisonOperator, UnknownOperator};

/// An annotation attached to an equation line.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `!bound var a b`: restricts the search domain for `var`.
    Bound { variable: String, low: Expr, high: Expr },

    /// `!guess var a b`: forces a numeric search for `var` within the range.
    Guess { variable: String, low: Expr, high: Expr },

    /// `!if a op b`: the line is only attempted while the comparison holds.
    If(Condition),

    /// A trailing `;`: the solved variable is hidden from the report.
    Suppress,
}

/// The comparison gating an `!if` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub lhs: Expr,
    pub op: ComparisonOperator,
    pub rhs: Expr,
    text: String,
}

impl Condition {
    /// Evaluates the comparison against the known values.
    ///
    /// An operand that cannot be evaluated yet leaves the condition
    /// unsatisfied.
    pub fn is_satisfied<S: Scope + ?Sized>(&self, scope: &S, toolkit: &Toolkit) -> bool {
        match (
            evaluate(&self.lhs, scope, toolkit),
            evaluate(&self.rhs, scope, toolkit),
        ) {
            (Ok(lhs), Ok(rhs)) => self.op.compare(lhs, rhs),
            _ => false,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Errors produced while parsing directive text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DirectiveError {
    #[error("cannot read directives at `{0}`")]
    Syntax(String),

    #[error("unknown directive `!{0}`")]
    Unknown(String),

    #[error("`!{keyword}` expects {expected}")]
    Arity {
        keyword: &'static str,
        expected: &'static str,
    },

    #[error("`{0}` is not a variable name")]
    NotAVariable(String),

    #[error("bad operand `{token}`: {source}")]
    Operand {
        token: String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Operator(#[from] UnknownOperator),
}

/// Parses the directive part of a line (starting at its first `!`).
///
/// # Errors
///
/// Returns a [`DirectiveError`] if the text is not a sequence of known
/// directives with the right number of arguments.
pub fn parse_directives(text: &str) -> Result<Vec<Directive>, DirectiveError> {
    let groups = match all_consuming(groups).parse(text) {
        Ok((_, groups)) => groups,
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            return Err(DirectiveError::Syntax(e.input.trim().to_string()));
        }
        Err(nom::Err::Incomplete(_)) => return Err(DirectiveError::Syntax(text.to_string())),
    };

    groups
        .into_iter()
        .map(|(keyword, args)| build(keyword, &args))
        .collect()
}

type PResult<'a, O> = IResult<&'a str, O>;

/// `("!" keyword (ws token)*)*`
fn groups(input: &str) -> PResult<'_, Vec<(&str, Vec<&str>)>> {
    delimited(
        multispace0,
        many0(terminated(group, multispace0)),
        multispace0,
    )
    .parse(input)
}

fn group(input: &str) -> PResult<'_, (&str, Vec<&str>)> {
    preceded(char('!'), pair(alpha1, many0(preceded(multispace1, token)))).parse(input)
}

fn token(input: &str) -> PResult<'_, &str> {
    take_till1(|c: char| c.is_whitespace() || c == '!').parse(input)
}

fn build(keyword: &str, args: &[&str]) -> Result<Directive, DirectiveError> {
    match keyword {
        "bound" => {
            let (variable, low, high) = range("bound", args)?;
            Ok(Directive::Bound {
                variable,
                low,
                high,
            })
        }
        "guess" => {
            let (variable, low, high) = range("guess", args)?;
            Ok(Directive::Guess {
                variable,
                low,
                high,
            })
        }
        "if" => {
            let &[lhs, op, rhs] = args else {
                return Err(DirectiveError::Arity {
                    keyword: "if",
                    expected: "`<value> <op> <value>`",
                });
            };
            Ok(Directive::If(Condition {
                lhs: operand(lhs)?,
                op: op.parse()?,
                rhs: operand(rhs)?,
                text: args.join(" "),
            }))
        }
        other => Err(DirectiveError::Unknown(other.to_string())),
    }
}

fn range(keyword: &'static str, args: &[&str]) -> Result<(String, Expr, Expr), DirectiveError> {
    let &[variable, low, high] = args else {
        return Err(DirectiveError::Arity {
            keyword,
            expected: "`<variable> <low> <high>`",
        });
    };

    match operand(variable)? {
        Expr::Variable(name) => Ok((name, operand(low)?, operand(high)?)),
        _ => Err(DirectiveError::NotAVariable(variable.to_string())),
    }
}

fn operand(token: &str) -> Result<Expr, DirectiveError> {
    Expr::parse(token).map_err(|source| DirectiveError::Operand {
        token: token.to_string(),
        source,
    })
}
