use std::convert::Infallible;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use thiserror::Error;

use frees_core::Model;

use super::{Action, Config, Error, Event, Status, percent_error, solve, solve_unobserved};

/// Wraps a plain function as a model.
struct Func<F>(F);

impl<F: Fn(f64) -> f64> Model for Func<F> {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn call(&self, x: &f64) -> Result<f64, Self::Error> {
        Ok((self.0)(*x))
    }
}

#[test]
fn finds_square_root() {
    let model = Func(|x: f64| x.powi(2));

    let solution = solve_unobserved(&model, 81.0, [0.0, 100.0], &Config::default())
        .expect("should converge");

    assert_eq!(solution.status, Status::Converged);
    assert_abs_diff_eq!(solution.x, 9.0, epsilon = 1e-5);
    assert!(solution.percent_error < 1e-3);
    assert!(!solution.on_boundary);
}

#[test]
fn bounds_select_the_root() {
    let model = Func(|x: f64| x.powi(2));

    let solution = solve_unobserved(&model, 81.0, [-100.0, 0.0], &Config::default())
        .expect("should converge");

    assert_abs_diff_eq!(solution.x, -9.0, epsilon = 1e-5);
}

#[test]
fn bounds_may_be_reversed() {
    let model = Func(|x: f64| 3.0 * x + 1.0);

    let solution = solve_unobserved(&model, 10.0, [50.0, -50.0], &Config::default())
        .expect("should converge");

    assert_abs_diff_eq!(solution.x, 3.0, epsilon = 1e-5);
}

#[test]
fn never_leaves_the_bounds() {
    let model = Func(|x: f64| x.powi(2));
    let mut seen = Vec::new();
    let observer = |event: &Event| -> Option<Action> {
        seen.push(event.x());
        None
    };

    let solution = solve(&model, 81.0, [20.0, 50.0], &Config::default(), observer)
        .expect("should finish");

    assert!(seen.iter().all(|x| (20.0..=50.0).contains(x)));
    assert_relative_eq!(solution.x, 20.0);
    assert!(solution.on_boundary);
}

#[test]
fn step_magnitude_never_grows() {
    let model = Func(|x: f64| x.powi(3) - 2.0 * x);
    let mut steps = Vec::new();
    let observer = |event: &Event| -> Option<Action> {
        let Event::Evaluated { step, .. } = *event;
        steps.push(step.abs());
        None
    };

    solve(&model, 4.0, [-10.0, 10.0], &Config::default(), observer).expect("should finish");

    assert!(steps.windows(2).all(|pair| pair[1] <= pair[0]));
}

#[test]
fn walks_across_undefined_region() {
    let model = Func(f64::sqrt);

    let solution = solve_unobserved(&model, 3.0, [-100.0, 100.0], &Config::default())
        .expect("should converge");

    assert_abs_diff_eq!(solution.x, 9.0, epsilon = 1e-5);
}

#[test]
fn returns_best_point_not_last_overshoot() {
    let model = Func(|x: f64| (x - 1.0).abs());
    let config = Config::new(8, 1e-3, 100_000).expect("valid config");

    let solution = solve_unobserved(&model, 0.0, [0.0, 2.0], &config).expect("should converge");

    // Start at 0, step 0.25 lands exactly on the minimum at 1.
    assert_relative_eq!(solution.x, 1.0);
    assert_relative_eq!(solution.error, 0.0);
}

#[test]
fn observer_can_stop_early() {
    let model = Func(|x: f64| x);
    let mut calls = 0;
    let observer = |_: &Event| {
        calls += 1;
        (calls == 3).then_some(Action::StopEarly)
    };

    let solution =
        solve(&model, 5.0, [0.0, 10.0], &Config::default(), observer).expect("should stop");

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.iters, 3);
}

#[test]
fn stops_at_eval_limit() {
    let model = Func(|x: f64| x.powi(2));
    let config = Config::new(8, 1e-12, 10).expect("valid config");

    let solution = solve_unobserved(&model, 2.0, [0.0, 2.0], &config).expect("should finish");

    assert_eq!(solution.status, Status::MaxEvals);
    assert_eq!(solution.iters, 10);
}

#[test]
fn rejects_non_finite_target() {
    let model = Func(|x: f64| x);
    let result = solve_unobserved(&model, f64::NAN, [0.0, 1.0], &Config::default());
    assert!(matches!(result, Err(Error::InvalidTarget(_))));
}

#[test]
fn rejects_empty_bounds() {
    let model = Func(|x: f64| x);
    let result = solve_unobserved(&model, 1.0, [1.0, 1.0], &Config::default());
    assert!(matches!(result, Err(Error::InvalidBounds { .. })));
}

#[derive(Debug, Error)]
#[error("undefined above {limit}")]
struct UndefinedAbove {
    limit: f64,
}

struct FailsAbove(f64);

impl Model for FailsAbove {
    type Input = f64;
    type Output = f64;
    type Error = UndefinedAbove;

    fn call(&self, x: &f64) -> Result<f64, Self::Error> {
        if *x > self.0 {
            Err(UndefinedAbove { limit: self.0 })
        } else {
            Ok(*x)
        }
    }
}

#[test]
fn model_errors_propagate() {
    let result = solve_unobserved(&FailsAbove(1.0), 50.0, [0.0, 10.0], &Config::default());

    let Err(Error::Model(source)) = result else {
        panic!("expected a model error");
    };
    assert_eq!(source.to_string(), "undefined above 1");
}

#[test]
fn percent_error_guards_zero_target() {
    assert_relative_eq!(percent_error(11.0, 10.0), 10.0);
    assert_relative_eq!(percent_error(-9.0, -10.0), 10.0);
    assert_relative_eq!(percent_error(1e-22, 0.0), 1.0);
}
