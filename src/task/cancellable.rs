// ABOUTME: Wraps a single async operation so its result can be disowned.
// ABOUTME: Silent policy never settles after cancel; Rejecting policy yields Cancelled.

use std::future::Future;
use tokio::task::JoinHandle;

use super::CancelToken;

/// What the observer sees once a task has been cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelPolicy {
    /// The result never settles; the caller has simply stopped looking.
    #[default]
    Silent,
    /// The result settles with [`Cancelled`] so the caller can branch on it.
    Rejecting,
}

/// Returned by a [`CancelPolicy::Rejecting`] task that was cancelled.
///
/// Distinct from whatever error type the wrapped operation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation was cancelled")]
pub struct Cancelled;

/// A spawned operation whose result can be disowned.
///
/// Cancellation suppresses or redirects *observation* of the result; it does
/// not abort the underlying work. The operation runs on its own tokio task,
/// and cancelling merely detaches from it.
#[must_use = "a cancellable task does nothing observable unless its result is awaited"]
pub struct CancellableTask<T> {
    handle: JoinHandle<T>,
    token: CancelToken,
    policy: CancelPolicy,
}

impl<T: Send + 'static> CancellableTask<T> {
    /// Spawn `future` with a fresh cancellation token.
    pub fn wrap<F>(future: F, policy: CancelPolicy) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::with_token(future, policy, CancelToken::new())
    }

    /// Spawn `future` observed through an existing token.
    ///
    /// Pass a child token to tie the task to an enclosing scope.
    pub fn with_token<F>(future: F, policy: CancelPolicy, token: CancelToken) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
            token,
            policy,
        }
    }

    pub fn policy(&self) -> CancelPolicy {
        self.policy
    }

    /// A handle that cancels this task when triggered.
    pub fn canceller(&self) -> CancelToken {
        self.token.clone()
    }

    /// Cancel observation. Idempotent, and a no-op once the result was taken.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the wrapped operation.
    ///
    /// The cancellation flag is checked when the operation settles, so a
    /// value that arrives after `cancel()` is discarded.
    ///
    /// If the operation is aborted without `cancel()` having been called,
    /// for instance because its runtime shut down, this yields [`Cancelled`]
    /// even under [`CancelPolicy::Silent`].
    ///
    /// # Panics
    ///
    /// Re-raises a panic from the wrapped operation unless the task was
    /// cancelled first.
    pub async fn result(self) -> Result<T, Cancelled> {
        let Self {
            mut handle,
            token,
            policy,
        } = self;

        let joined = tokio::select! {
            biased;
            () = token.cancelled() => None,
            joined = &mut handle => Some(joined),
        };

        if !token.is_cancelled() {
            match joined {
                Some(Ok(value)) => return Ok(value),
                Some(Err(err)) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                // Aborted from outside, e.g. runtime shutdown. Settles under either policy.
                Some(Err(_)) => return Err(Cancelled),
                None => {}
            }
        }

        // Dropping the handle detaches; the work itself keeps running.
        drop(handle);

        match policy {
            CancelPolicy::Rejecting => Err(Cancelled),
            CancelPolicy::Silent => std::future::pending().await,
        }
    }
}

impl<T> std::fmt::Debug for CancellableTask<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellableTask")
            .field("policy", &self.policy)
            .field("cancelled", &self.token.is_cancelled())
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}
