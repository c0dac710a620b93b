//! FrEES, the free engineering equation solver.
//!
//! Write a system as plain-text lines of `lhs = rhs` in any order. Each sweep
//! solves every line that has a single unknown, until a sweep finds nothing
//! new.
//!
//! ```
//! use frees::Solver;
//!
//! let report = Solver::default().solve(
//!     "
//!     x + y = 87
//!     y = 90 ;
//!     A = pi * x**2   # pi comes from the toolkit
//!     ",
//! );
//!
//! assert!((report.value("x").unwrap() + 3.0).abs() < 1e-4);
//! assert_eq!(report.value("y"), None);
//! assert!(report.is_clean());
//! ```
//!
//! # Line syntax
//!
//! - `#` starts a comment.
//! - `!bound var a b` limits the numeric search for `var` to `[a, b]`. A
//!   value computed directly outside the bound is kept with a warning.
//! - `!guess var a b` forces a numeric search for `var` within `[a, b]`.
//! - `!if a op b` only attempts the line while the comparison holds
//!   (`<`, `>`, `<=`, `>=`, `=`, `==`, `/=`).
//! - A trailing `;` hides the line's variable from the report.
//! - A line starting with `Solution:` ends the system.

mod classify;
mod comparison;
mod directive;
mod line;
mod model;
mod report;

pub mod solver;

pub use classify::{Classification, Method, Target, classify};
pub use comparison::{ComparisonOperator, UnknownOperator};
pub use directive::{Condition, Directive, DirectiveError, parse_directives};
pub use line::{Equation, Line, LineError, Side, parse_line};
pub use model::ExprModel;
pub use report::{Report, Status, Warning, WarningKind};
pub use solver::{Action, Config, ConfigError, Event, Solver};

pub use frees_core::{Dimension, Toolkit, Unit, UnitTable, Value};
