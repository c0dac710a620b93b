use frees_solvers::equation::narrowing;
use thiserror::Error;

/// Percent error above which a searched value is flagged.
const DEFAULT_ERROR_THRESHOLD: f64 = 0.1;

/// Configuration for the system solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Settings", into = "Settings")
)]
pub struct Config {
    search: narrowing::Config,
    default_bounds: [f64; 2],
    max_sweeps: usize,
    error_threshold: f64,
}

/// Errors that can occur when validating a solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    Search(#[from] narrowing::ConfigError),

    #[error("default bounds must be finite and distinct")]
    DefaultBounds,

    #[error("max_sweeps must be at least 1")]
    MaxSweeps,

    #[error("error threshold must be a finite, non-negative percentage")]
    ErrorThreshold,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: narrowing::Config::default(),
            default_bounds: [-1e20, 1e20],
            max_sweeps: 1_000,
            error_threshold: DEFAULT_ERROR_THRESHOLD,
        }
    }
}

impl Config {
    /// Creates a new config.
    ///
    /// `precision` is the step size at which a numeric search stops, and
    /// `steps` the number of steps the search domain is first divided into.
    ///
    /// # Errors
    ///
    /// Returns an error if the search settings are invalid, the default
    /// bounds are not finite and distinct, or `max_sweeps` is zero.
    pub fn new(
        precision: f64,
        steps: usize,
        default_bounds: [f64; 2],
        max_sweeps: usize,
        max_evals: usize,
    ) -> Result<Self, ConfigError> {
        let search = narrowing::Config::new(steps, precision, max_evals)?;

        let [a, b] = default_bounds;
        if !a.is_finite() || !b.is_finite() || a == b {
            return Err(ConfigError::DefaultBounds);
        }
        if max_sweeps == 0 {
            return Err(ConfigError::MaxSweeps);
        }

        Ok(Self {
            search,
            default_bounds: [a.min(b), a.max(b)],
            max_sweeps,
            error_threshold: DEFAULT_ERROR_THRESHOLD,
        })
    }

    /// Sets the percent error above which a searched value is flagged.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ErrorThreshold` if `percent` is negative or not
    /// finite.
    pub fn with_error_threshold(self, percent: f64) -> Result<Self, ConfigError> {
        if !percent.is_finite() || percent < 0.0 {
            return Err(ConfigError::ErrorThreshold);
        }
        Ok(Self {
            error_threshold: percent,
            ..self
        })
    }

    #[must_use]
    pub fn precision(&self) -> f64 {
        self.search.tolerance()
    }

    #[must_use]
    pub fn steps(&self) -> usize {
        self.search.steps()
    }

    /// Returns the search domain used when a line has no `!bound`.
    #[must_use]
    pub fn default_bounds(&self) -> [f64; 2] {
        self.default_bounds
    }

    #[must_use]
    pub fn max_sweeps(&self) -> usize {
        self.max_sweeps
    }

    /// Returns the evaluation limit for a single numeric search.
    #[must_use]
    pub fn max_evals(&self) -> usize {
        self.search.max_evals()
    }

    /// Returns the percent error above which a searched value is flagged.
    #[must_use]
    pub fn error_threshold(&self) -> f64 {
        self.error_threshold
    }

    pub(crate) fn search(&self) -> &narrowing::Config {
        &self.search
    }
}

/// Flat, unvalidated form of [`Config`] used for (de)serialization.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Settings {
    precision: f64,
    steps: usize,
    default_bounds: [f64; 2],
    max_sweeps: usize,
    max_evals: usize,
    error_threshold: f64,
}

#[cfg(feature = "serde")]
impl Default for Settings {
    fn default() -> Self {
        Config::default().into()
    }
}

#[cfg(feature = "serde")]
impl From<Config> for Settings {
    fn from(config: Config) -> Self {
        Self {
            precision: config.precision(),
            steps: config.steps(),
            default_bounds: config.default_bounds(),
            max_sweeps: config.max_sweeps(),
            max_evals: config.max_evals(),
            error_threshold: config.error_threshold(),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<Settings> for Config {
    type Error = ConfigError;

    fn try_from(settings: Settings) -> Result<Self, Self::Error> {
        Self::new(
            settings.precision,
            settings.steps,
            settings.default_bounds,
            settings.max_sweeps,
            settings.max_evals,
        )?
        .with_error_threshold(settings.error_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let default = Config::default();
        let validated = Config::new(
            default.precision(),
            default.steps(),
            default.default_bounds(),
            default.max_sweeps(),
            default.max_evals(),
        );
        assert_eq!(validated, Ok(default));
    }

    #[test]
    fn default_values() {
        let config = Config::default();
        assert_eq!(config.precision(), 1e-6);
        assert_eq!(config.steps(), 8);
        assert_eq!(config.default_bounds(), [-1e20, 1e20]);
        assert_eq!(config.error_threshold(), 0.1);
    }

    #[test]
    fn orders_default_bounds() {
        let config = Config::new(1e-6, 8, [10.0, -10.0], 5, 100).unwrap();
        assert_eq!(config.default_bounds(), [-10.0, 10.0]);
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            Config::new(0.0, 8, [0.0, 1.0], 5, 100),
            Err(ConfigError::Search(narrowing::ConfigError::Tolerance))
        );
        assert_eq!(
            Config::new(1e-6, 8, [1.0, 1.0], 5, 100),
            Err(ConfigError::DefaultBounds)
        );
        assert_eq!(
            Config::new(1e-6, 8, [0.0, 1.0], 0, 100),
            Err(ConfigError::MaxSweeps)
        );
    }

    #[test]
    fn error_threshold_is_validated() {
        let config = Config::default().with_error_threshold(5.0).unwrap();
        assert_eq!(config.error_threshold(), 5.0);
        assert_eq!(config.max_sweeps(), 1_000);

        assert_eq!(
            Config::default().with_error_threshold(-1.0),
            Err(ConfigError::ErrorThreshold)
        );
        assert_eq!(
            Config::default().with_error_threshold(f64::NAN),
            Err(ConfigError::ErrorThreshold)
        );
    }
}
