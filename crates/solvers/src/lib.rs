//! Numerical solvers for FrEES.
//!
//! Solvers operate on any [`Model`](frees_core::Model) and report progress
//! through an [`Observer`](frees_core::Observer).

pub mod equation;
