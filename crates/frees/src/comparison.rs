use std::{fmt, str::FromStr};

use thiserror::Error;

/// Relative tolerance for the equality operators.
const EQUALITY_TOLERANCE: f64 = 1e-9;

/// A comparison operator usable in an `!if` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Lt,
    Gt,
    Le,
    Ge,
    /// `=`
    Eq,
    /// `==`, same meaning as `=`
    EqEq,
    /// `/=`
    Ne,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid comparison operator `{0}` (expected one of <, >, <=, >=, =, ==, /=)")]
pub struct UnknownOperator(pub String);

impl ComparisonOperator {
    /// Applies the operator.
    ///
    /// The equality operators allow a relative difference of `1e-9`, so
    /// values produced by arithmetic still compare equal.
    #[must_use]
    pub fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Gt => lhs > rhs,
            Self::Le => lhs <= rhs,
            Self::Ge => lhs >= rhs,
            Self::Eq | Self::EqEq => nearly_equal(lhs, rhs),
            Self::Ne => !nearly_equal(lhs, rhs),
        }
    }
}

fn nearly_equal(lhs: f64, rhs: f64) -> bool {
    lhs == rhs || (lhs - rhs).abs() <= EQUALITY_TOLERANCE * lhs.abs().max(rhs.abs())
}

impl FromStr for ComparisonOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Self::Lt),
            ">" => Ok(Self::Gt),
            "<=" => Ok(Self::Le),
            ">=" => Ok(Self::Ge),
            "=" => Ok(Self::Eq),
            "==" => Ok(Self::EqEq),
            "/=" => Ok(Self::Ne),
            _ => Err(UnknownOperator(s.to_string())),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "=",
            Self::EqEq => "==",
            Self::Ne => "/=",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_operator() {
        for op in ["<", ">", "<=", ">=", "=", "==", "/="] {
            let parsed: ComparisonOperator = op.parse().unwrap();
            assert_eq!(parsed.to_string(), op);
        }
    }

    #[test]
    fn rejects_other_spellings() {
        for op in ["!=", "<>", "=>", "", "eq"] {
            assert!(op.parse::<ComparisonOperator>().is_err(), "accepted `{op}`");
        }
    }

    #[test]
    fn ordering_operators() {
        assert!(ComparisonOperator::Lt.compare(1.0, 2.0));
        assert!(!ComparisonOperator::Gt.compare(1.0, 2.0));
        assert!(ComparisonOperator::Le.compare(2.0, 2.0));
        assert!(ComparisonOperator::Ge.compare(3.0, 2.0));
    }

    #[test]
    fn equality_tolerates_rounding() {
        assert!(ComparisonOperator::Eq.compare(0.1 + 0.2, 0.3));
        assert!(ComparisonOperator::EqEq.compare(0.0, 0.0));
        assert!(ComparisonOperator::Ne.compare(1.0, 1.001));
        assert!(!ComparisonOperator::Ne.compare(1e6, 1e6 + 1e-6));
    }
}
