use thiserror::Error;

/// Configuration for the narrowing solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    steps: usize,
    tolerance: f64,
    max_evals: usize,
}

/// Errors that can occur when validating a narrowing solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("steps must be at least 3")]
    Steps,

    #[error("tolerance must be finite and positive")]
    Tolerance,

    #[error("max_evals must be at least 1")]
    MaxEvals,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steps: 8,
            tolerance: 1e-6,
            max_evals: 100_000,
        }
    }
}

impl Config {
    /// Creates a new config.
    ///
    /// # Errors
    ///
    /// Returns an error if `steps < 3` (the step would never shrink), the
    /// tolerance is not a finite positive number, or `max_evals` is zero.
    pub fn new(steps: usize, tolerance: f64, max_evals: usize) -> Result<Self, ConfigError> {
        if steps < 3 {
            return Err(ConfigError::Steps);
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::Tolerance);
        }
        if max_evals == 0 {
            return Err(ConfigError::MaxEvals);
        }

        Ok(Self {
            steps,
            tolerance,
            max_evals,
        })
    }

    /// Returns the number of steps the domain is initially divided into.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the step size below which the search stops.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the maximum number of model evaluations.
    #[must_use]
    pub fn max_evals(&self) -> usize {
        self.max_evals
    }

    /// Returns the factor applied to the step after each overshoot.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn shrink_factor(&self) -> f64 {
        -2.0 / self.steps as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let default = Config::default();
        let validated = Config::new(default.steps(), default.tolerance(), default.max_evals());
        assert_eq!(validated, Ok(default));
    }

    #[test]
    fn rejects_steps_that_never_shrink() {
        assert_eq!(Config::new(2, 1e-6, 10), Err(ConfigError::Steps));
    }

    #[test]
    fn rejects_bad_tolerance() {
        assert_eq!(Config::new(8, 0.0, 10), Err(ConfigError::Tolerance));
        assert_eq!(Config::new(8, f64::NAN, 10), Err(ConfigError::Tolerance));
    }

    #[test]
    fn rejects_zero_evals() {
        assert_eq!(Config::new(8, 1e-6, 0), Err(ConfigError::MaxEvals));
    }
}
