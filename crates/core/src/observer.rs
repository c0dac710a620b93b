/// Receives solver events and decides how the solve should proceed.
///
/// Both the root finder and the system driver report progress through an
/// observer. Returning `Some(action)` requests a solver-specific action,
/// returning `None` lets the solver continue unchanged.
///
/// Closures implement `Observer`, and `()` is the no-op observer.
pub trait Observer<E, A> {
    /// Observes a solver event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
