use std::time::Duration;

use crate::equation::Evaluation;

use super::{Error, Solution, Status, domain::Domain, percent_error};

/// Tracks the lowest-error evaluation encountered so far.
///
/// The narrowing walk deliberately overshoots the minimum, so the last
/// evaluated point is not necessarily the best one.
pub(super) struct Best {
    eval: Option<Evaluation>,
}

impl Best {
    pub(super) fn empty() -> Self {
        Self { eval: None }
    }

    /// Updates the best evaluation if the error improves.
    pub(super) fn update(&mut self, eval: Evaluation) {
        if let Some(best) = self.eval.as_ref()
            && eval.error >= best.error
        {
            return;
        }
        self.eval = Some(eval);
    }

    /// Finalizes the solver using the best available evaluation.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSuccessfulEvaluation` if nothing was evaluated.
    pub(super) fn finish(
        self,
        status: Status,
        iters: usize,
        target: f64,
        domain: &Domain,
        duration: Duration,
    ) -> Result<Solution, Error> {
        let eval = self.eval.ok_or(Error::NoSuccessfulEvaluation)?;
        Ok(Solution {
            status,
            x: eval.x,
            output: eval.output,
            error: eval.error,
            percent_error: percent_error(eval.output, target),
            iters,
            duration,
            on_boundary: domain.is_edge(eval.x),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn eval(x: f64, output: f64, target: f64) -> Evaluation {
        Evaluation {
            x,
            output,
            error: (output - target).abs(),
        }
    }

    fn domain() -> Domain {
        Domain::new([0.0, 10.0]).unwrap()
    }

    #[test]
    fn keeps_lowest_error() {
        let mut best = Best::empty();
        best.update(eval(1.0, 3.0, 5.0));
        best.update(eval(2.0, 5.5, 5.0));
        best.update(eval(3.0, 7.0, 5.0));

        let solution = best
            .finish(Status::Converged, 3, 5.0, &domain(), Duration::ZERO)
            .expect("best eval");

        assert_relative_eq!(solution.x, 2.0);
        assert_relative_eq!(solution.percent_error, 10.0);
        assert!(!solution.on_boundary);
    }

    #[test]
    fn infinite_error_never_replaces_finite() {
        let mut best = Best::empty();
        best.update(eval(4.0, 1.0, 2.0));
        best.update(Evaluation {
            x: 5.0,
            output: f64::NAN,
            error: f64::INFINITY,
        });

        let solution = best
            .finish(Status::MaxEvals, 2, 2.0, &domain(), Duration::ZERO)
            .expect("best eval");
        assert_relative_eq!(solution.x, 4.0);
    }

    #[test]
    fn reports_boundary() {
        let mut best = Best::empty();
        best.update(eval(10.0, 1.0, 1.0));

        let solution = best
            .finish(Status::Converged, 1, 1.0, &domain(), Duration::ZERO)
            .expect("best eval");
        assert!(solution.on_boundary);
    }

    #[test]
    fn finish_errors_without_eval() {
        let best = Best::empty();
        let err = best.finish(Status::StoppedByObserver, 0, 1.0, &domain(), Duration::ZERO);
        assert!(matches!(err, Err(Error::NoSuccessfulEvaluation)));
    }
}
