/// A callable model that maps an input to an output.
///
/// The root finder only ever sees a model, never the expression behind it,
/// so anything from a parsed equation side to a plain closure can be searched.
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Calls the model with the given input.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

impl<M: Model + ?Sized> Model for &M {
    type Input = M::Input;
    type Output = M::Output;
    type Error = M::Error;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        (**self).call(input)
    }
}
