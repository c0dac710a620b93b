use crate::report::Warning;

/// Events emitted by the system solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    /// A line produced a value for its unknown.
    LineSolved {
        line: usize,
        variable: &'a str,
        value: f64,
        percent_error: f64,
    },

    /// A line was attempted but produced a warning.
    LineWarned { warning: &'a Warning },

    /// A sweep over every line finished.
    SweepFinished {
        sweep: usize,

        /// Number of values known after the sweep.
        known: usize,

        /// Number of values the sweep added.
        new_bindings: usize,
    },
}
