// ABOUTME: A scope that owns every cancellable task started on behalf of one owner.
// ABOUTME: Cancelling or dropping the scope cancels all of its outstanding tasks.

use std::future::Future;

use super::{CancelPolicy, CancelToken, CancellableTask};

/// Groups tasks under one owner, such as a status view or a CLI command.
///
/// Each task gets a child of the scope's token, so `cancel_all()` reaches
/// every task that was started through the scope. A scope stays cancelled;
/// tasks wrapped after cancellation start out cancelled.
#[derive(Debug)]
pub struct TaskScope {
    token: CancelToken,
    policy: CancelPolicy,
}

impl TaskScope {
    pub fn new(policy: CancelPolicy) -> Self {
        Self {
            token: CancelToken::new(),
            policy,
        }
    }

    /// Scope whose tasks reject with `Cancelled`.
    pub fn rejecting() -> Self {
        Self::new(CancelPolicy::Rejecting)
    }

    /// Scope whose tasks go quiet on cancellation.
    pub fn silent() -> Self {
        Self::new(CancelPolicy::Silent)
    }

    pub fn policy(&self) -> CancelPolicy {
        self.policy
    }

    /// Wrap `future` so it is cancelled together with the scope.
    pub fn wrap<F>(&self, future: F) -> CancellableTask<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        CancellableTask::with_token(future, self.policy, self.token.child_token())
    }

    /// A token for work that is not a single task, such as a poll loop.
    pub fn child_token(&self) -> CancelToken {
        self.token.child_token()
    }

    pub fn cancel_all(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
