use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use frees_core::{Toolkit, evaluate};
use frees_solvers::equation::narrowing;
use log::debug;

use crate::{
    classify::{Classification, Method, Target, classify},
    line::{Equation, Line},
    model::ExprModel,
    report::WarningKind,
};

use super::Config;

/// What attempting one line produced.
pub(super) enum Outcome {
    /// Nothing to do: skipped, or already solved.
    Idle,

    /// The line could not be solved this sweep.
    Warned { kind: WarningKind, text: String },

    Solved(Solved),
}

/// A value produced by one line.
pub(super) struct Solved {
    pub(super) variable: String,
    pub(super) value: f64,
    pub(super) percent_error: f64,
    pub(super) duration: Duration,
    pub(super) suppressed: bool,

    /// Warnings that accompany the value.
    pub(super) warnings: Vec<(WarningKind, String)>,
}

/// Classifies a line and solves it if it has a single unknown.
pub(super) fn attempt(
    line: &Line,
    known: &BTreeMap<String, f64>,
    toolkit: &Toolkit,
    config: &Config,
) -> Outcome {
    let target = match classify(line, known, toolkit, config.default_bounds()) {
        Classification::Skip | Classification::NoOp => return Outcome::Idle,
        Classification::TooManyUnknowns { unknowns } => {
            return warned(
                WarningKind::TooManyUnknowns,
                format!("too many unknowns: {}", unknowns.join(", ")),
            );
        }
        Classification::ConditionFailed { condition } => {
            return warned(
                WarningKind::ConditionNotSatisfied,
                format!("condition `{condition}` is not satisfied"),
            );
        }
        Classification::Malformed { reason } => return warned(WarningKind::Malformed, reason),
        Classification::Solvable(target) => target,
    };

    // A solvable classification only comes from an equation.
    let Line::Equation(equation) = line else {
        return Outcome::Idle;
    };

    solve_target(equation, target, known, toolkit, config)
}

fn solve_target(
    equation: &Equation,
    target: Target,
    known: &BTreeMap<String, f64>,
    toolkit: &Toolkit,
    config: &Config,
) -> Outcome {
    let started = Instant::now();
    let unknown_side = equation.side(target.side);
    let known_side = equation.side(target.side.opposite());

    let goal = match evaluate(known_side, known, toolkit) {
        Ok(goal) if goal.is_finite() => goal,
        Ok(goal) => {
            return warned(
                WarningKind::EvaluationFailed,
                format!("{} side evaluates to {goal}", target.side.opposite()),
            );
        }
        Err(error) => {
            return warned(
                WarningKind::EvaluationFailed,
                format!("cannot evaluate {} side: {error}", target.side.opposite()),
            );
        }
    };

    let Target {
        unknown,
        bounds,
        bounded,
        method,
        ..
    } = target;
    let [low, high] = bounds;

    let mut warnings = Vec::new();
    let (value, percent_error) = match method {
        Method::Direct => {
            if bounded && !(low..=high).contains(&goal) {
                warnings.push((
                    WarningKind::OutOfBounds,
                    format!("`{unknown}` = {goal} is outside its bound [{low}, {high}]"),
                ));
            }
            (goal, 0.0)
        }
        Method::Search => {
            let model = ExprModel::new(unknown_side, &unknown, known, toolkit);
            let solution =
                match narrowing::solve_unobserved(&model, goal, bounds, config.search()) {
                    Ok(solution) => solution,
                    Err(error) => {
                        return warned(
                            WarningKind::EvaluationFailed,
                            format!("cannot solve for `{unknown}`: {error}"),
                        );
                    }
                };

            if !solution.error.is_finite() {
                return warned(
                    WarningKind::EvaluationFailed,
                    format!("no finite value for `{unknown}` in [{low}, {high}]"),
                );
            }
            debug!(
                "`{unknown}`: {:?} after {} evaluations",
                solution.status, solution.iters
            );

            if solution.status != narrowing::Status::Converged {
                warnings.push((
                    WarningKind::NotConverged,
                    format!(
                        "search for `{unknown}` stopped after {} evaluations ({:?})",
                        solution.iters, solution.status
                    ),
                ));
            }
            if solution.on_boundary {
                warnings.push((
                    WarningKind::BoundarySolution,
                    format!(
                        "`{unknown}` = {} is on the search bound [{low}, {high}]",
                        solution.x
                    ),
                ));
            }
            let relative = relative_error(goal, &solution);
            if relative > config.error_threshold() {
                warnings.push((
                    WarningKind::HighError,
                    format!(
                        "`{unknown}` = {} has high error ({relative:.5}%)",
                        solution.x
                    ),
                ));
            }
            (solution.x, solution.percent_error)
        }
    };

    Outcome::Solved(Solved {
        variable: unknown,
        value,
        percent_error,
        duration: started.elapsed(),
        suppressed: equation.is_suppressed(),
        warnings,
    })
}

/// Percent error used to flag a searched value.
///
/// A zero goal has no scale of its own, so its residual is measured against
/// one instead.
fn relative_error(goal: f64, solution: &narrowing::Solution) -> f64 {
    if goal == 0.0 {
        100.0 * solution.error
    } else {
        solution.percent_error
    }
}

fn warned(kind: WarningKind, text: String) -> Outcome {
    Outcome::Warned { kind, text }
}
