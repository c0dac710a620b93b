//! The read-only table of functions, constants, and units available to
//! expressions.
//!
//! A [`Toolkit`] is built once and shared by reference for the life of a
//! solve. Functions receive their arguments as [`Value`]s so that `convert`
//! can take unit names as quoted text.

mod functions;
mod units;

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

use nom::{Parser, combinator::all_consuming, multi::fold_many0};
use thiserror::Error;

use crate::expr::{Token, token};

pub use units::{Dimension, Unit, UnitTable};

/// A toolkit function.
pub type Function =
    Arc<dyn for<'a, 'b> Fn(&'a [Value<'b>]) -> Result<f64, FunctionError> + Send + Sync>;

const CONVERT: &str = "convert";

/// A function argument: either a number or a quoted text literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Number(f64),
    Text(&'a str),
}

impl<'a> Value<'a> {
    /// Returns the number, or an error naming the 1-based argument position.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionError::ExpectedNumber`] for a text argument.
    pub fn number(&self, position: usize) -> Result<f64, FunctionError> {
        match *self {
            Self::Number(value) => Ok(value),
            Self::Text(_) => Err(FunctionError::ExpectedNumber { position }),
        }
    }

    /// Returns the text, or an error naming the 1-based argument position.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionError::ExpectedText`] for a numeric argument.
    pub fn text(&self, position: usize) -> Result<&'a str, FunctionError> {
        match *self {
            Self::Text(text) => Ok(text),
            Self::Number(_) => Err(FunctionError::ExpectedText { position }),
        }
    }
}

/// Errors a toolkit function can return.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FunctionError {
    #[error("expected {expected} argument(s), got {found}")]
    Arity { expected: usize, found: usize },

    #[error("expected at least {minimum} argument(s), got {found}")]
    TooFewArguments { minimum: usize, found: usize },

    #[error("argument {position} must be a number")]
    ExpectedNumber { position: usize },

    #[error("argument {position} must be quoted text")]
    ExpectedText { position: usize },

    #[error("unknown unit `{0}`")]
    UnknownUnit(String),

    #[error("cannot convert `{from}` ({from_dimension}) to `{to}` ({to_dimension})")]
    IncompatibleUnits {
        from: String,
        from_dimension: Dimension,
        to: String,
        to_dimension: Dimension,
    },
}

/// Functions, named constants, and units usable inside expressions.
#[derive(Clone, Default)]
pub struct Toolkit {
    functions: HashMap<String, Function>,
    constants: BTreeMap<String, String>,
    units: UnitTable,
    bound_convert: bool,
}

impl Toolkit {
    #[must_use]
    pub fn builder() -> ToolkitBuilder {
        ToolkitBuilder::default()
    }

    /// Returns the standard toolkit: common math functions, `convert` over
    /// [`UnitTable::standard`], and the constants `pi`, `g_n`, `R_u`, and
    /// `sigma_sb`.
    #[must_use]
    pub fn standard() -> Self {
        functions::register(Self::builder())
            .units(UnitTable::standard())
            .constant("pi", "3.141592653589793")
            .constant("g_n", "9.80665")
            .constant("R_u", "8.314462618")
            .constant("sigma_sb", "5.670374419e-8")
            .build()
    }

    /// Returns a builder seeded with this toolkit's contents.
    ///
    /// An automatically bound `convert` is dropped so that the rebuilt
    /// toolkit binds it to the builder's final unit table.
    #[must_use]
    pub fn to_builder(&self) -> ToolkitBuilder {
        let mut functions = self.functions.clone();
        if self.bound_convert {
            functions.remove(CONVERT);
        }
        ToolkitBuilder {
            functions,
            constants: self.constants.clone(),
            units: self.units.clone(),
        }
    }

    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Returns the literal text a constant expands to.
    #[must_use]
    pub fn constant(&self, name: &str) -> Option<&str> {
        self.constants.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    /// Returns true if `name` is a function or constant.
    ///
    /// Such names are never treated as unknowns.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.constants.contains_key(name)
    }

    /// Returns the registered function names in sorted order.
    #[must_use]
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Replaces every whole-identifier occurrence of a constant with its
    /// literal, wrapped in parentheses.
    ///
    /// The text is lexed with the expression tokenizer: quoted text and `#`
    /// comments are copied unchanged, `2e5` keeps its exponent, and `pipe`
    /// is not `pi`.
    #[must_use]
    pub fn substitute_constants(&self, text: &str) -> String {
        if self.constants.is_empty() {
            return text.to_string();
        }

        let substitute = fold_many0(
            token,
            || String::with_capacity(text.len()),
            |mut out, lexed| {
                match lexed {
                    Token::Identifier(name) => match self.constants.get(name) {
                        Some(literal) => {
                            out.push('(');
                            out.push_str(literal);
                            out.push(')');
                        }
                        None => out.push_str(name),
                    },
                    Token::Verbatim(piece) => out.push_str(piece),
                }
                out
            },
        );

        match all_consuming(substitute).parse(text) {
            Ok((_, out)) => out,
            Err(_) => text.to_string(),
        }
    }
}

impl fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolkit")
            .field("functions", &self.function_names())
            .field("constants", &self.constants)
            .field("units", &self.units.len())
            .finish()
    }
}

/// Assembles a [`Toolkit`].
///
/// If the builder has any units and no function named `convert`, building
/// registers `convert(value, "from", "to")` over the final unit table.
#[derive(Clone, Default)]
pub struct ToolkitBuilder {
    functions: HashMap<String, Function>,
    constants: BTreeMap<String, String>,
    units: UnitTable,
}

impl ToolkitBuilder {
    /// Adds or replaces a function.
    #[must_use]
    pub fn function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: for<'a, 'b> Fn(&'a [Value<'b>]) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    /// Adds or replaces a constant, given as the literal text it expands to.
    #[must_use]
    pub fn constant(mut self, name: impl Into<String>, literal: impl Into<String>) -> Self {
        self.constants.insert(name.into(), literal.into());
        self
    }

    /// Adds or replaces a single unit.
    #[must_use]
    pub fn unit(mut self, name: impl Into<String>, unit: Unit) -> Self {
        self.units.insert(name, unit);
        self
    }

    /// Replaces the whole unit table.
    #[must_use]
    pub fn units(mut self, units: UnitTable) -> Self {
        self.units = units;
        self
    }

    #[must_use]
    pub fn build(mut self) -> Toolkit {
        let bound_convert = !self.units.is_empty() && !self.functions.contains_key(CONVERT);
        if bound_convert {
            let units = self.units.clone();
            self.functions.insert(
                CONVERT.to_string(),
                Arc::new(move |args: &[Value<'_>]| functions::convert(&units, args)),
            );
        }

        Toolkit {
            functions: self.functions,
            constants: self.constants,
            units: self.units,
            bound_convert,
        }
    }
}

impl fmt::Debug for ToolkitBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ToolkitBuilder")
            .field("functions", &names)
            .field("constants", &self.constants)
            .field("units", &self.units.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn standard_names_are_reserved() {
        let toolkit = Toolkit::standard();

        for name in ["sin", "sqrt", "log", "ln", "convert", "pi", "g_n"] {
            assert!(toolkit.contains(name), "{name} should be reserved");
        }
        assert!(!toolkit.contains("x"));
        assert!(!toolkit.contains("Sin"));
    }

    #[test]
    fn constants_substitute_whole_identifiers_only() {
        let toolkit = Toolkit::standard();

        assert_eq!(
            toolkit.substitute_constants("a = pi * r**2"),
            "a = (3.141592653589793) * r**2"
        );
        assert_eq!(toolkit.substitute_constants("pipe = spin + pi_2"), "pipe = spin + pi_2");
        assert_eq!(toolkit.substitute_constants("w = m*g_n"), "w = m*(9.80665)");
    }

    #[test]
    fn substitution_skips_numbers_quotes_and_comments() {
        let toolkit = Toolkit::builder().constant("e", "2.718281828459045").build();

        assert_eq!(toolkit.substitute_constants("x = 2e5 + 1.e3"), "x = 2e5 + 1.e3");
        assert_eq!(
            toolkit.substitute_constants("y = f(\"e\") # e's value\nz = e"),
            "y = f(\"e\") # e's value\nz = (2.718281828459045)"
        );
        assert_eq!(
            toolkit.substitute_constants("s = 'e\nt = e"),
            "s = 'e\nt = (2.718281828459045)"
        );
    }

    #[test]
    fn custom_functions_extend_the_standard_set() {
        let toolkit = Toolkit::standard()
            .to_builder()
            .function("twice", |args: &[Value<'_>]| Ok(2.0 * args[0].number(1)?))
            .build();

        let twice = toolkit.function("twice").expect("registered");
        assert_relative_eq!(twice(&[Value::Number(4.5)]).unwrap(), 9.0);
        assert!(toolkit.contains("sqrt"));
    }

    #[test]
    fn rebuilt_convert_sees_new_units() {
        let toolkit = Toolkit::standard()
            .to_builder()
            .unit("furlong", Unit::new(Dimension::Length, 201.168))
            .build();

        let convert = toolkit.function("convert").expect("bound on build");
        let yards = convert(&[Value::Number(1.0), Value::Text("furlong"), Value::Text("yd")]);
        assert_relative_eq!(yards.unwrap(), 220.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_toolkit_has_no_convert() {
        let toolkit = Toolkit::builder().build();
        assert!(toolkit.function("convert").is_none());
        assert!(toolkit.function_names().is_empty());
    }
}
