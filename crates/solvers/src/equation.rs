//! Solvers for single-unknown equations `f(x) = target`.
//!
//! A model maps a candidate `x` to `f(x)`. The error at `x` is
//! `|f(x) - target|`, and solvers in this module drive it toward zero within a
//! bounded domain.
//!
//! # Solvers
//!
//! - [`narrowing`]: derivative-free adaptive bidirectional narrowing

mod evaluate;

pub use evaluate::{Evaluation, evaluate};

pub mod narrowing;
