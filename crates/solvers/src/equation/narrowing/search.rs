use std::time::Instant;

use frees_core::{Model, Observer};

use crate::equation::{Evaluation, evaluate};

use super::{Action, Config, Error, Event, Solution, best::Best, domain::Domain, solution::Status};

/// Core narrowing search implementation.
pub(super) fn search<M, Obs>(
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
    let started = Instant::now();
    let domain = Domain::new(bounds)?;
    if !target.is_finite() {
        return Err(Error::InvalidTarget(target));
    }

    let mut run = Run {
        model,
        target,
        max_evals: config.max_evals(),
        observer,
        best: Best::empty(),
        evals: 0,
    };

    let status = match narrow(&mut run, &domain, config) {
        Ok(()) => Status::Converged,
        Err(Halt::Stopped(status)) => status,
        Err(Halt::Failed(error)) => return Err(error),
    };

    let evals = run.evals;
    run.best
        .finish(status, evals, target, &domain, started.elapsed())
}

/// The walk itself: advance while improving, overshoot once, reverse and
/// shrink, until the step falls below tolerance.
fn narrow<M, Obs>(run: &mut Run<'_, M, Obs>, domain: &Domain, config: &Config) -> Result<(), Halt>
where
    M: Model<Input = f64, Output = f64>,
    Obs: Observer<Event, Action>,
{
    #[allow(clippy::cast_precision_loss)]
    let mut step = domain.width() / config.steps() as f64;
    let mut current = run.evaluate(domain.low, step)?;

    while step.abs() >= config.tolerance() {
        let overshoot = loop {
            let x = domain.clamp(current.x + step);
            if x == current.x {
                break None;
            }
            let next = run.evaluate(x, step)?;
            if advances(&current, &next) {
                current = next;
            } else {
                break Some(next);
            }
        };

        if let Some(past) = overshoot {
            current = past;
        }
        step *= config.shrink_factor();
    }

    Ok(())
}

/// Returns true if the walk should move from `current` to `next`.
///
/// Crossing a region where the output is not finite counts as progress.
fn advances(current: &Evaluation, next: &Evaluation) -> bool {
    next.error < current.error || (current.error.is_infinite() && next.error.is_infinite())
}

/// Why the walk stopped before converging.
enum Halt {
    Stopped(Status),
    Failed(Error),
}

/// Mutable search state shared by every evaluation.
struct Run<'m, M, Obs> {
    model: &'m M,
    target: f64,
    max_evals: usize,
    observer: Obs,
    best: Best,
    evals: usize,
}

impl<M, Obs> Run<'_, M, Obs>
where
    M: Model<Input = f64, Output = f64>,
    Obs: Observer<Event, Action>,
{
    /// Evaluate at `x`, record it, emit the event, and handle observer action.
    fn evaluate(&mut self, x: f64, step: f64) -> Result<Evaluation, Halt> {
        if self.evals >= self.max_evals {
            return Err(Halt::Stopped(Status::MaxEvals));
        }

        let eval = evaluate(self.model, self.target, x)
            .map_err(|e| Halt::Failed(Error::Model(Box::new(e))))?;
        self.evals += 1;
        self.best.update(eval);

        let event = Event::Evaluated {
            x: eval.x,
            output: eval.output,
            error: eval.error,
            step,
        };
        match self.observer.observe(&event) {
            Some(Action::StopEarly) => Err(Halt::Stopped(Status::StoppedByObserver)),
            None => Ok(eval),
        }
    }
}
