//! Adaptive bidirectional narrowing for bounded single-variable root finding.
//!
//! # Algorithm
//!
//! The search starts at the low end of the domain with a step of
//! `(high - low) / steps`. It walks in the step's direction while each move
//! strictly reduces the error `|f(x) - target|`, takes one step past the
//! located minimum, then shrinks the step by `-2 / steps`. The sign flip turns
//! the walk into a narrowing oscillation around the minimum. The search ends
//! once `|step|` falls below the configured tolerance.
//!
//! Every candidate is clamped to `[low, high]`, so the returned `x` always
//! lies inside the domain. A solution exactly on an endpoint is flagged with
//! [`Solution::on_boundary`]: the true root may lie outside the domain.
//!
//! # Limitations
//!
//! - **Local only**: finds the minimum of the error closest to the walk, not
//!   necessarily a root. Check [`Solution::percent_error`].
//! - **Unimodal assumption**: multi-root functions need tight bounds.
//!
//! # Observer Events
//!
//! The solver emits one [`Event::Evaluated`] per successful model call.
//! Observers can return [`Action::StopEarly`] to halt and keep the best point
//! found so far.

mod action;
mod best;
mod config;
mod domain;
mod error;
mod event;
mod search;
mod solution;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use frees_core::{Model, Observer};

use search::search;

/// Denominator used by [`percent_error`] when the target is exactly zero.
pub const ZERO_TARGET_GUARD: f64 = 1e-20;

/// Finds `x` in `bounds` where the model output is closest to `target`.
///
/// The bounds may be given in either order.
///
/// # Errors
///
/// Returns an error if the bounds or target are not usable, or if the model
/// fails during evaluation.
pub fn solve<M, Obs>(
    model: &M,
    target: f64,
    bounds: [f64; 2],
    config: &Config,
    observer: Obs,
) -> Result<Solution, Error>
where
    M: Model<Input = f64, Output = f64>,
    Obs: Observer<Event, Action>,
{
    search(model, target, bounds, config, observer)
}

/// Finds `x` in `bounds` without observer support.
///
/// This is a convenience wrapper around [`solve`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error if the bounds or target are not usable, or if the model
/// fails during evaluation.
pub fn solve_unobserved<M>(
    model: &M,
    target: f64,
    bounds: [f64; 2],
    config: &Config,
) -> Result<Solution, Error>
where
    M: Model<Input = f64, Output = f64>,
{
    solve(model, target, bounds, config, ())
}

/// Returns `100 * |output - target| / |target|`.
///
/// A zero target is replaced by [`ZERO_TARGET_GUARD`].
#[must_use]
pub fn percent_error(output: f64, target: f64) -> f64 {
    let denominator = if target == 0.0 {
        ZERO_TARGET_GUARD
    } else {
        target.abs()
    };
    100.0 * (output - target).abs() / denominator
}
