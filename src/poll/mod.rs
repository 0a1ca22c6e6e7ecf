// ABOUTME: Fixed-interval status polling with a terminal predicate and an iteration budget.
// ABOUTME: Every session ends in exactly one PollOutcome.

mod outcome;
mod poll_loop;
mod request;
mod retry;

pub use outcome::PollOutcome;
pub use poll_loop::{PollHandle, PollLoop};
pub use request::{DEFAULT_INTERVAL, DEFAULT_MAX_ITERATIONS, PollRequest};
pub use retry::RetryPolicy;

/// A poll request that cannot be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    #[error("poll iteration budget must be greater than zero")]
    ZeroIterations,
}
