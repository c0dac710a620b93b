use frees_core::Model;

/// The result of evaluating a model at a candidate `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub x: f64,

    /// The model output `f(x)`.
    pub output: f64,

    /// `|f(x) - target|`, or infinity when the output is not finite.
    pub error: f64,
}

/// Calls the model at `x` and measures how far the output is from `target`.
///
/// # Errors
///
/// Returns the model's error if the call fails.
pub fn evaluate<M>(model: &M, target: f64, x: f64) -> Result<Evaluation, M::Error>
where
    M: Model<Input = f64, Output = f64>,
{
    let output = model.call(&x)?;
    let error = if output.is_finite() {
        (output - target).abs()
    } else {
        f64::INFINITY
    };

    Ok(Evaluation { x, output, error })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    struct Reciprocal;

    impl Model for Reciprocal {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, x: &f64) -> Result<f64, Self::Error> {
            Ok(1.0 / x)
        }
    }

    #[test]
    fn error_is_distance_to_target() {
        let eval = evaluate(&Reciprocal, 0.5, 4.0).unwrap();
        assert_relative_eq!(eval.output, 0.25);
        assert_relative_eq!(eval.error, 0.25);
    }

    #[test]
    fn non_finite_output_has_infinite_error() {
        let eval = evaluate(&Reciprocal, 0.5, 0.0).unwrap();
        assert!(eval.output.is_infinite());
        assert_eq!(eval.error, f64::INFINITY);
    }
}
