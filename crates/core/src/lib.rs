//! Core traits and types for FrEES, the free engineering equation solver.
//!
//! This crate defines the shared pieces that the root finder and the system
//! driver build on:
//!
//! - [`Expr`]: a parsed numeric expression, evaluated with [`evaluate`]
//!   against a [`Scope`] of known variables
//! - [`Toolkit`]: the read-only table of functions, constants, and units
//!   usable inside expressions
//! - [`Model`]: a callable that maps a typed input to a typed output
//! - [`Observer`]: receives solver events and optionally returns control actions

pub mod expr;
pub mod toolkit;

mod model;
mod observer;

pub use expr::{EvalError, Expr, Overlay, ParseError, Scope, evaluate};
pub use model::Model;
pub use observer::Observer;
pub use toolkit::{
    Dimension, Function, FunctionError, Toolkit, ToolkitBuilder, Unit, UnitTable, Value,
};
