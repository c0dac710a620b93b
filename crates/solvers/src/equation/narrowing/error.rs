/// Errors that can occur during a narrowing search.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("bounds [{low}, {high}] must be finite and distinct")]
    InvalidBounds { low: f64, high: f64 },

    #[error("target {0} is not finite")]
    InvalidTarget(f64),

    #[error("model error: {0}")]
    Model(Box<dyn std::error::Error + Send + Sync>),

    #[error("no successful evaluation")]
    NoSuccessfulEvaluation,
}
