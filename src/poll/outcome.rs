// ABOUTME: The single result produced by one poll session.
// ABOUTME: Completed, Cancelled, Exhausted, or Failed, exactly one per session.

/// How a poll session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<S, E> {
    /// The terminal predicate accepted this status.
    Completed(S),
    /// The session was cancelled before a terminal status was observed.
    Cancelled,
    /// The iteration budget ran out. Carries the last status observed, which
    /// is `None` only if every iteration ended in a retried fetch failure.
    Exhausted(Option<S>),
    /// A fetch failed and the retry policy did not allow another attempt.
    Failed(E),
}

impl<S, E> PollOutcome<S, E> {
    pub fn is_completed(&self) -> bool {
        matches!(self, PollOutcome::Completed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PollOutcome::Cancelled)
    }

    /// The final or last observed status, if any.
    pub fn status(&self) -> Option<&S> {
        match self {
            PollOutcome::Completed(status) => Some(status),
            PollOutcome::Exhausted(last) => last.as_ref(),
            PollOutcome::Cancelled | PollOutcome::Failed(_) => None,
        }
    }

    /// Convert the status payload, keeping the variant.
    pub fn map_status<T>(self, f: impl FnOnce(S) -> T) -> PollOutcome<T, E> {
        match self {
            PollOutcome::Completed(status) => PollOutcome::Completed(f(status)),
            PollOutcome::Cancelled => PollOutcome::Cancelled,
            PollOutcome::Exhausted(last) => PollOutcome::Exhausted(last.map(f)),
            PollOutcome::Failed(error) => PollOutcome::Failed(error),
        }
    }
}
