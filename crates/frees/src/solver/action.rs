/// Actions an observer can take while a system is being solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop solving and report what has been found so far.
    StopEarly,
}
