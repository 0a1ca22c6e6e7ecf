// ABOUTME: Retry policy for status fetch failures inside a poll session.
// ABOUTME: Fail-fast by default; optionally retries failures classified as transient.

use std::sync::Arc;

type Classifier<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Decides whether a failed fetch ends the poll session.
///
/// A retried failure still consumes an iteration and waits for the regular
/// interval, so the session's overall time bound is unchanged.
pub enum RetryPolicy<E> {
    /// Any fetch failure ends the session with `Failed`.
    FailFast,
    /// Failures the classifier accepts are retried, at most `attempts` times
    /// over the whole session.
    Transient {
        attempts: u32,
        classify: Classifier<E>,
    },
}

impl<E> RetryPolicy<E> {
    pub fn fail_fast() -> Self {
        RetryPolicy::FailFast
    }

    pub fn transient<C>(attempts: u32, classify: C) -> Self
    where
        C: Fn(&E) -> bool + Send + Sync + 'static,
    {
        if attempts == 0 {
            return RetryPolicy::FailFast;
        }
        RetryPolicy::Transient {
            attempts,
            classify: Arc::new(classify),
        }
    }

    /// Whether `error` may be retried given `used` earlier retries.
    pub fn allows(&self, error: &E, used: u32) -> bool {
        match self {
            RetryPolicy::FailFast => false,
            RetryPolicy::Transient { attempts, classify } => used < *attempts && classify(error),
        }
    }
}

impl<E> Default for RetryPolicy<E> {
    fn default() -> Self {
        RetryPolicy::FailFast
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        match self {
            RetryPolicy::FailFast => RetryPolicy::FailFast,
            RetryPolicy::Transient { attempts, classify } => RetryPolicy::Transient {
                attempts: *attempts,
                classify: Arc::clone(classify),
            },
        }
    }
}

impl<E> std::fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryPolicy::FailFast => f.write_str("FailFast"),
            RetryPolicy::Transient { attempts, .. } => f
                .debug_struct("Transient")
                .field("attempts", attempts)
                .finish_non_exhaustive(),
        }
    }
}
