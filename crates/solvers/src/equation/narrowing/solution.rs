use std::time::Duration;

/// Indicates how the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The step shrank below the tolerance.
    Converged,

    /// Reached the evaluation limit before the step shrank enough.
    MaxEvals,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a narrowing search.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// The best x found, always inside the bounds.
    pub x: f64,

    /// Model output at `x`.
    pub output: f64,

    /// `|output - target|` at `x`.
    pub error: f64,

    /// Error relative to the target, in percent.
    pub percent_error: f64,

    /// Number of model evaluations.
    pub iters: usize,

    /// Wall-clock time spent searching.
    pub duration: Duration,

    /// True if `x` is exactly one of the bounds.
    pub on_boundary: bool,
}
