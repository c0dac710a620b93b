/// Events emitted by the narrowing solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The model was evaluated at `x`.
    Evaluated {
        x: f64,

        /// The model output at `x`.
        output: f64,

        /// `|output - target|`, infinite for a non-finite output.
        error: f64,

        /// The signed step in effect when `x` was chosen.
        step: f64,
    },
}

impl Event {
    /// Returns the x value that was evaluated.
    #[must_use]
    pub fn x(&self) -> f64 {
        match self {
            Self::Evaluated { x, .. } => *x,
        }
    }
}
