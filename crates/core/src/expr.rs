//! Numeric expressions: syntax tree, parser, and evaluator.
//!
//! Expressions are parsed once into an [`Expr`] tree restricted to arithmetic
//! operators, numeric literals, variable lookups, and calls into the
//! [`Toolkit`](crate::Toolkit). Evaluation walks the tree against a [`Scope`]
//! of known variable values, so no expression text is ever executed.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use frees_core::{Expr, Toolkit, evaluate};
//!
//! let expr = Expr::parse("2 * r ** 2 + sqrt(h)").unwrap();
//! let scope = HashMap::from([("r".to_string(), 3.0), ("h".to_string(), 16.0)]);
//!
//! let value = evaluate(&expr, &scope, &Toolkit::standard()).unwrap();
//! assert_eq!(value, 22.0);
//! ```

mod eval;
mod parse;
mod scope;

use std::fmt;

pub use eval::{EvalError, evaluate};
pub use parse::ParseError;
pub(crate) use parse::{Token, token};
pub use scope::{Overlay, Scope};

/// A parsed numeric expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal.
    Number(f64),

    /// A quoted string literal, only meaningful as a function argument
    /// (unit names for `convert`, for example).
    Text(String),

    /// A reference to a variable by name.
    Variable(String),

    /// A prefix sign applied to an operand.
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// A binary arithmetic operation.
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// A call into a toolkit function.
    Call { name: String, args: Vec<Expr> },
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
}

/// Infix arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl Expr {
    /// Parses expression text into a syntax tree.
    ///
    /// Both `**` and `^` denote exponentiation.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text is blank or not a well-formed
    /// expression.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse::parse(text)
    }

    pub(crate) fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub(crate) fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Returns the variable names referenced by the expression, each once, in
    /// order of first appearance.
    ///
    /// Function names and text inside quoted literals are not included.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut found = Vec::new();
        self.collect_names(Name::Variable, &mut found);
        found
    }

    /// Returns the names of the functions the expression calls, each once, in
    /// order of first appearance.
    #[must_use]
    pub fn functions(&self) -> Vec<&str> {
        let mut found = Vec::new();
        self.collect_names(Name::Function, &mut found);
        found
    }

    fn collect_names<'a>(&'a self, kind: Name, found: &mut Vec<&'a str>) {
        fn push<'a>(found: &mut Vec<&'a str>, name: &'a str) {
            if !found.contains(&name) {
                found.push(name);
            }
        }

        match self {
            Self::Number(_) | Self::Text(_) => {}
            Self::Variable(name) => {
                if kind == Name::Variable {
                    push(found, name);
                }
            }
            Self::Unary { operand, .. } => operand.collect_names(kind, found),
            Self::Binary { lhs, rhs, .. } => {
                lhs.collect_names(kind, found);
                rhs.collect_names(kind, found);
            }
            Self::Call { name, args } => {
                if kind == Name::Function {
                    push(found, name);
                }
                for arg in args {
                    arg.collect_names(kind, found);
                }
            }
        }
    }

    /// Returns true if the expression is exactly the bare variable `name`.
    #[must_use]
    pub fn is_variable(&self, name: &str) -> bool {
        matches!(self, Self::Variable(var) if var == name)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Name {
    Variable,
    Function,
}

impl UnaryOp {
    pub(crate) fn apply(self, value: f64) -> f64 {
        match self {
            Self::Neg => -value,
            Self::Pos => value,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Pos => "+",
        }
    }
}

impl BinaryOp {
    pub(crate) fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            // Floored modulo: the result takes the sign of the divisor.
            Self::Rem => lhs - rhs * (lhs / rhs).floor(),
            Self::Pow => lhs.powf(rhs),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Pow => "**",
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "\"{text}\""),
            Self::Variable(name) => f.write_str(name),
            Self::Unary { op, operand } => write!(f, "({}{operand})", op.symbol()),
            Self::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Self::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
