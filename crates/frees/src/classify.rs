//! Deciding what, if anything, a line can solve given the known values.

use std::collections::BTreeMap;

use frees_core::{EvalError, Expr, Toolkit, evaluate};

use crate::{
    directive::Directive,
    line::{Equation, Line, Side},
};

/// The outcome of classifying one line against the known values.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Blank, comment, or not an equation.
    Skip,

    /// Every variable is already known.
    NoOp,

    /// More than one unknown, or unknowns on both sides.
    TooManyUnknowns { unknowns: Vec<String> },

    /// An `!if` directive does not hold.
    ConditionFailed { condition: String },

    /// The line cannot be used as written.
    Malformed { reason: String },

    /// Exactly one unknown on exactly one side.
    Solvable(Target),
}

/// What a solvable line solves for, and how.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub unknown: String,

    /// The side holding the unknown.
    pub side: Side,

    /// Search domain, ordered `[low, high]`.
    pub bounds: [f64; 2],

    /// True when `bounds` come from a `!bound` or `!guess` on the line.
    pub bounded: bool,

    pub method: Method,
}

/// How a target is solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// The unknown side is the bare variable: evaluate the other side.
    Direct,

    /// Search the bounds for the value that balances the equation.
    Search,
}

/// Classifies a parsed line against the known values.
///
/// Names defined by the toolkit count as known. This function has no side
/// effects; the driver calls it for every line on every sweep.
#[must_use]
pub fn classify(
    line: &Line,
    known: &BTreeMap<String, f64>,
    toolkit: &Toolkit,
    default_bounds: [f64; 2],
) -> Classification {
    let equation = match line {
        Line::Blank | Line::Text => return Classification::Skip,
        Line::Malformed(error) => {
            return Classification::Malformed {
                reason: error.to_string(),
            };
        }
        Line::Equation(equation) => equation,
    };

    if let Some(name) = [&equation.lhs, &equation.rhs]
        .into_iter()
        .flat_map(Expr::functions)
        .find(|name| toolkit.function(name).is_none())
    {
        return Classification::Malformed {
            reason: format!("unknown function `{name}`"),
        };
    }

    let unknowns = |expr: &Expr| -> Vec<String> {
        expr.variables()
            .into_iter()
            .filter(|name| !known.contains_key(*name) && !toolkit.contains(name))
            .map(str::to_string)
            .collect()
    };
    let lhs = unknowns(&equation.lhs);
    let rhs = unknowns(&equation.rhs);

    let (unknown, side) = match (lhs.as_slice(), rhs.as_slice()) {
        ([], []) => return Classification::NoOp,
        ([name], []) => (name.clone(), Side::Left),
        ([], [name]) => (name.clone(), Side::Right),
        _ => {
            let mut all = lhs;
            for name in rhs {
                if !all.contains(&name) {
                    all.push(name);
                }
            }
            return Classification::TooManyUnknowns { unknowns: all };
        }
    };

    if let Some(condition) = equation
        .conditions()
        .find(|condition| !condition.is_satisfied(known, toolkit))
    {
        return Classification::ConditionFailed {
            condition: condition.to_string(),
        };
    }

    let (bounds, bounded, guessed) = match range_for(equation, &unknown, known, toolkit) {
        Ok(Some((bounds, guessed))) => (bounds, true, guessed),
        Ok(None) => (default_bounds, false, false),
        Err(reason) => return Classification::Malformed { reason },
    };

    let method = if !guessed && equation.side(side).is_variable(&unknown) {
        Method::Direct
    } else {
        Method::Search
    };

    Classification::Solvable(Target {
        unknown,
        side,
        bounds,
        bounded,
        method,
    })
}

/// Finds the last `!bound` or `!guess` range for `unknown`, returning the
/// ordered bounds and whether the directive was a guess.
fn range_for(
    equation: &Equation,
    unknown: &str,
    known: &BTreeMap<String, f64>,
    toolkit: &Toolkit,
) -> Result<Option<([f64; 2], bool)>, String> {
    let Some((low, high, guessed)) =
        equation
            .directives
            .iter()
            .rev()
            .find_map(|directive| match directive {
                Directive::Bound {
                    variable,
                    low,
                    high,
                } if variable == unknown => Some((low, high, false)),
                Directive::Guess {
                    variable,
                    low,
                    high,
                } if variable == unknown => Some((low, high, true)),
                _ => None,
            })
    else {
        return Ok(None);
    };

    let value = |expr: &Expr| -> Result<f64, String> {
        match evaluate(expr, known, toolkit) {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(value) => Err(format!("bound `{expr}` for `{unknown}` is {value}")),
            Err(EvalError::UnknownVariable(name)) => Err(format!(
                "bound for `{unknown}` uses `{name}`, which is not known yet"
            )),
            Err(error) => Err(format!("bound for `{unknown}`: {error}")),
        }
    };

    let (a, b) = (value(low)?, value(high)?);
    Ok(Some(([a.min(b), a.max(b)], guessed)))
}
