// ABOUTME: Describes one poll session: what to fetch, how often, and when to stop.
// ABOUTME: Built with a small builder and validated before the loop starts.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::time::Duration;

use super::{PollError, RetryPolicy};

type FetchFn<S, E> = Box<dyn Fn() -> BoxFuture<'static, Result<S, E>> + Send + Sync>;
type TerminalFn<S> = Box<dyn Fn(&S) -> bool + Send + Sync>;
type UpdateFn<S> = Box<dyn Fn(&S) + Send + Sync>;

/// Default delay between fetches.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Default iteration budget; with the default interval this bounds a session
/// at roughly one hour.
pub const DEFAULT_MAX_ITERATIONS: u32 = 720;

/// A status-polling session.
///
/// `fetch` must be idempotent since it is called once per iteration, and
/// `is_terminal` must be free of side effects. Observers hook in through
/// `on_update`, which sees every fetched status before the terminal check.
pub struct PollRequest<S, E> {
    pub(crate) fetch: FetchFn<S, E>,
    pub(crate) is_terminal: TerminalFn<S>,
    pub(crate) on_update: Option<UpdateFn<S>>,
    pub(crate) interval: Duration,
    pub(crate) max_iterations: u32,
    pub(crate) retry: RetryPolicy<E>,
}

impl<S, E> PollRequest<S, E>
where
    S: Send + 'static,
    E: Send + 'static,
{
    pub fn new<F, Fut, P>(fetch: F, is_terminal: P) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S, E>> + Send + 'static,
        P: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Self {
            fetch: Box::new(move || fetch().boxed()),
            is_terminal: Box::new(is_terminal),
            on_update: None,
            interval: DEFAULT_INTERVAL,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            retry: RetryPolicy::FailFast,
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn on_update<U>(mut self, on_update: U) -> Self
    where
        U: Fn(&S) + Send + Sync + 'static,
    {
        self.on_update = Some(Box::new(on_update));
        self
    }

    pub fn retry(mut self, retry: RetryPolicy<E>) -> Self {
        self.retry = retry;
        self
    }
}

impl<S, E> PollRequest<S, E> {
    pub fn validate(&self) -> Result<(), PollError> {
        if self.interval.is_zero() {
            return Err(PollError::ZeroInterval);
        }
        if self.max_iterations == 0 {
            return Err(PollError::ZeroIterations);
        }
        Ok(())
    }

    pub fn get_interval(&self) -> Duration {
        self.interval
    }

    pub fn get_max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Longest time the session can spend sleeping between fetches.
    pub fn time_bound(&self) -> Duration {
        self.interval
            .saturating_mul(self.max_iterations.saturating_sub(1))
    }
}

impl<S, E> std::fmt::Debug for PollRequest<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollRequest")
            .field("interval", &self.interval)
            .field("max_iterations", &self.max_iterations)
            .field("retry", &self.retry)
            .field("on_update", &self.on_update.is_some())
            .finish_non_exhaustive()
    }
}
