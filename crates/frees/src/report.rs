use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    time::Duration,
};

/// Indicates how a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Status {
    /// A full sweep produced no new values.
    Converged,

    /// Reached the sweep limit while still producing values.
    SweepLimit,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of solving an equation system.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Report {
    /// Solved values, excluding suppressed variables.
    pub values: BTreeMap<String, f64>,

    /// Variables that were solved but hidden with `;`.
    pub suppressed: BTreeSet<String>,

    /// Time spent solving individual lines.
    pub duration: Duration,

    /// Largest percent error of any solved line.
    pub max_percent_error: f64,

    /// Warnings in line order: the final sweep's, then any raised when a
    /// value was produced.
    pub warnings: Vec<Warning>,

    /// Number of sweeps performed.
    pub sweeps: usize,

    pub status: Status,
}

impl Report {
    /// Returns the reported value of a variable.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Returns true if the solve converged without warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.status == Status::Converged && self.warnings.is_empty()
    }
}

/// Why a line produced a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WarningKind {
    TooManyUnknowns,
    ConditionNotSatisfied,

    /// The value landed exactly on a search bound; it was still recorded.
    BoundarySolution,

    /// A direct value lies outside the line's `!bound`; it was still recorded.
    OutOfBounds,

    /// The search hit its evaluation limit before narrowing to the precision.
    NotConverged,

    /// The best value found misses the equation by more than the configured
    /// percent error.
    HighError,

    EvaluationFailed,
    Malformed,
}

/// A non-fatal problem with one line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Warning {
    /// 1-based line number in the input text.
    pub line: usize,
    pub kind: WarningKind,
    pub text: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.text)
    }
}
