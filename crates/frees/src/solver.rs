//! The fixed-point driver that solves a whole equation system.
//!
//! # Algorithm
//!
//! Constants are substituted into the text once, then every line is parsed.
//! Each sweep visits the lines in order and classifies them against the
//! values known so far. A line with exactly one unknown on one side is solved,
//! directly when that side is the bare variable and with the
//! [narrowing](frees_solvers::equation::narrowing) root finder otherwise, and
//! the value is available to every later line immediately. Solving stops after
//! the first sweep that adds no value.
//!
//! Lines that cannot be solved never abort the solve. Each one produces a
//! [`Warning`]; the report carries the final sweep's warnings plus any
//! raised when a value was produced (a boundary solution, for example).
//!
//! # Observer Events
//!
//! [`Solver::solve_observed`] emits an [`Event`] for each solved line, each
//! warning, and each finished sweep. Observers can return
//! [`Action::StopEarly`] to end the solve with what is known so far.

mod action;
mod config;
mod event;
mod sweep;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use event::Event;

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use frees_core::{Observer, Toolkit};
use log::{debug, info};

use crate::{
    line::{Line, parse_line},
    report::{Report, Status, Warning},
};

use sweep::{Outcome, Solved};

/// Marks the start of a stored solution block below the equations.
const SOLUTION_TRAILER: &str = "Solution:";

/// Solves equation systems against a fixed toolkit.
///
/// A solver holds no per-solve state, so one instance can solve any number
/// of systems, including from several threads at once.
#[derive(Debug, Clone)]
pub struct Solver {
    toolkit: Toolkit,
    config: Config,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new(Toolkit::standard(), Config::default())
    }
}

impl Solver {
    #[must_use]
    pub fn new(toolkit: Toolkit, config: Config) -> Self {
        Self { toolkit, config }
    }

    #[must_use]
    pub fn toolkit(&self) -> &Toolkit {
        &self.toolkit
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Solves an equation system given as newline-separated lines.
    #[must_use]
    pub fn solve(&self, text: &str) -> Report {
        self.solve_observed(text, ())
    }

    /// Solves an equation system, reporting progress to an observer.
    ///
    /// See the [module docs](self) for the events emitted.
    pub fn solve_observed<Obs>(&self, text: &str, mut observer: Obs) -> Report
    where
        Obs: for<'a> Observer<Event<'a>, Action>,
    {
        let text = self.toolkit.substitute_constants(equations_only(text));
        let lines: Vec<Line> = text.lines().map(parse_line).collect();

        let mut state = State::default();
        let mut warnings: Vec<Warning> = Vec::new();
        let mut sweeps = 0;

        let status = 'sweeps: loop {
            if sweeps == self.config.max_sweeps() {
                break Status::SweepLimit;
            }
            sweeps += 1;
            warnings.clear();
            let before = state.known.len();
            debug!("sweep {sweeps}: {before} values known");

            for (index, line) in lines.iter().enumerate() {
                let number = index + 1;
                match sweep::attempt(line, &state.known, &self.toolkit, &self.config) {
                    Outcome::Idle => {}
                    Outcome::Warned { kind, text } => {
                        let warning = Warning {
                            line: number,
                            kind,
                            text,
                        };
                        debug!("{warning}");
                        let action = observer.observe(&Event::LineWarned { warning: &warning });
                        warnings.push(warning);
                        if action == Some(Action::StopEarly) {
                            break 'sweeps Status::StoppedByObserver;
                        }
                    }
                    Outcome::Solved(solved) => {
                        let action = observer.observe(&Event::LineSolved {
                            line: number,
                            variable: &solved.variable,
                            value: solved.value,
                            percent_error: solved.percent_error,
                        });
                        state.record(number, solved);
                        if action == Some(Action::StopEarly) {
                            break 'sweeps Status::StoppedByObserver;
                        }
                    }
                }
            }

            let known = state.known.len();
            let new_bindings = known - before;
            debug!("sweep {sweeps} finished: {new_bindings} new values");

            let event = Event::SweepFinished {
                sweep: sweeps,
                known,
                new_bindings,
            };
            if observer.observe(&event) == Some(Action::StopEarly) {
                break Status::StoppedByObserver;
            }
            if new_bindings == 0 {
                break Status::Converged;
            }
        };

        warnings.append(&mut state.warnings);
        warnings.sort_by_key(|warning| warning.line);

        let report = state.into_report(warnings, sweeps, status);
        info!(
            "{:?} after {} sweep(s): {} value(s), {} warning(s), max error {:.3e}%",
            report.status,
            report.sweeps,
            report.values.len() + report.suppressed.len(),
            report.warnings.len(),
            report.max_percent_error,
        );
        report
    }
}

/// Drops a stored `Solution:` block and everything after it.
fn equations_only(text: &str) -> &str {
    if text.starts_with(SOLUTION_TRAILER) {
        return "";
    }
    text.find(&format!("\n{SOLUTION_TRAILER}"))
        .map_or(text, |end| &text[..end])
}

/// Everything a solve accumulates across sweeps.
#[derive(Default)]
struct State {
    known: BTreeMap<String, f64>,
    suppressed: BTreeSet<String>,
    duration: Duration,
    max_percent_error: f64,

    /// Warnings raised when a value was produced; these outlive the sweep.
    warnings: Vec<Warning>,
}

impl State {
    fn record(&mut self, line: usize, solved: Solved) {
        debug!(
            "line {line}: {} = {} ({:.3e}% error)",
            solved.variable, solved.value, solved.percent_error
        );

        self.duration += solved.duration;
        self.max_percent_error = self.max_percent_error.max(solved.percent_error);
        for (kind, text) in solved.warnings {
            let warning = Warning { line, kind, text };
            debug!("{warning}");
            self.warnings.push(warning);
        }
        if solved.suppressed {
            self.suppressed.insert(solved.variable.clone());
        }
        self.known.insert(solved.variable, solved.value);
    }

    fn into_report(self, warnings: Vec<Warning>, sweeps: usize, status: Status) -> Report {
        let suppressed = self.suppressed;
        let values = self
            .known
            .into_iter()
            .filter(|(name, _)| !suppressed.contains(name))
            .collect();

        Report {
            values,
            suppressed,
            duration: self.duration,
            max_percent_error: self.max_percent_error,
            warnings,
            sweeps,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solution_trailer_is_ignored() {
        assert_eq!(equations_only("x = 1\nSolution:\nx = 2"), "x = 1");
        assert_eq!(equations_only("Solution:\nx = 2"), "");
        assert_eq!(equations_only("x = 1\n"), "x = 1\n");
    }
}
