// ABOUTME: Drives a poll session: sleep, fetch, report, check for a terminal status.
// ABOUTME: Runs inline or spawned; cancellation always wins over a late result.

use std::fmt::Display;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{PollError, PollOutcome, PollRequest};
use crate::task::{CancelPolicy, CancelToken, CancellableTask, Cancelled};

/// Entry points for running a [`PollRequest`].
pub struct PollLoop;

impl PollLoop {
    /// Spawn a poll session with its own cancellation token.
    ///
    /// # Errors
    ///
    /// Returns [`PollError`] if the request is invalid. Nothing is spawned then.
    pub fn start<S, E>(request: PollRequest<S, E>) -> Result<PollHandle<S, E>, PollError>
    where
        S: Send + 'static,
        E: Display + Send + 'static,
    {
        Self::start_with_token(request, CancelToken::new())
    }

    /// Spawn a poll session observed through `token`.
    ///
    /// Pass a child of a [`crate::task::TaskScope`] token so the session is
    /// cancelled along with its scope.
    pub fn start_with_token<S, E>(
        request: PollRequest<S, E>,
        token: CancelToken,
    ) -> Result<PollHandle<S, E>, PollError>
    where
        S: Send + 'static,
        E: Display + Send + 'static,
    {
        request.validate()?;
        let loop_token = token.clone();
        let handle = tokio::spawn(async move { drive(request, &loop_token).await });
        Ok(PollHandle { handle, token })
    }

    /// Run a poll session on the caller's task.
    pub async fn run<S, E>(
        request: PollRequest<S, E>,
        token: &CancelToken,
    ) -> Result<PollOutcome<S, E>, PollError>
    where
        S: Send + 'static,
        E: Display + Send + 'static,
    {
        request.validate()?;
        Ok(drive(request, token).await)
    }
}

async fn drive<S, E>(request: PollRequest<S, E>, token: &CancelToken) -> PollOutcome<S, E>
where
    S: Send + 'static,
    E: Display + Send + 'static,
{
    let PollRequest {
        fetch,
        is_terminal,
        on_update,
        interval,
        max_iterations,
        retry,
    } = request;

    let mut last = None;
    let mut retries_used = 0;

    for iteration in 0..max_iterations {
        if iteration > 0 {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(iteration, "poll cancelled while waiting");
                    return PollOutcome::Cancelled;
                }
                () = tokio::time::sleep(interval) => {}
            }
        }
        if token.is_cancelled() {
            return PollOutcome::Cancelled;
        }

        debug!(iteration, max_iterations, "fetching status");
        let task = CancellableTask::with_token(fetch(), CancelPolicy::Rejecting, token.clone());
        let status = match task.result().await {
            Err(Cancelled) => {
                debug!(iteration, "poll cancelled during fetch");
                return PollOutcome::Cancelled;
            }
            Ok(Err(error)) if retry.allows(&error, retries_used) => {
                retries_used += 1;
                warn!(iteration, retries_used, error = %error, "status fetch failed, retrying");
                continue;
            }
            Ok(Err(error)) => {
                debug!(iteration, error = %error, "status fetch failed");
                return PollOutcome::Failed(error);
            }
            Ok(Ok(status)) => status,
        };

        // A status that lands after cancel is discarded unseen.
        if token.is_cancelled() {
            return PollOutcome::Cancelled;
        }
        if let Some(on_update) = &on_update {
            on_update(&status);
        }
        if is_terminal(&status) {
            debug!(iteration, "terminal status reached");
            return PollOutcome::Completed(status);
        }
        last = Some(status);
    }

    debug!(max_iterations, "poll budget exhausted");
    PollOutcome::Exhausted(last)
}

/// A running poll session.
#[must_use = "dropping the handle detaches the poll loop without observing it"]
pub struct PollHandle<S, E> {
    handle: JoinHandle<PollOutcome<S, E>>,
    token: CancelToken,
}

impl<S, E> PollHandle<S, E> {
    /// Cancel the session. The pending timer and in-flight fetch are abandoned
    /// and the outcome becomes [`PollOutcome::Cancelled`].
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// A token that cancels this session, for handing to another owner.
    pub fn canceller(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the session to end.
    pub async fn outcome(self) -> PollOutcome<S, E> {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => PollOutcome::Cancelled,
        }
    }
}

impl<S, E> std::fmt::Debug for PollHandle<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollHandle")
            .field("cancelled", &self.token.is_cancelled())
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}
