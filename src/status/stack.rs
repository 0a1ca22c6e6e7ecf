// ABOUTME: Polls a CloudFormation stack's event history until the root stack settles.
// ABOUTME: Also launches create/update/delete and then follows the resulting events.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::{DeploymentStatus, StatusError};
use crate::ops::{OpsError, StackEvent, StackOps, StackRef, StackTemplate};
use crate::poll::{PollError, PollHandle, PollLoop, PollOutcome, PollRequest, RetryPolicy};
use crate::task::{CancelPolicy, CancelToken, CancellableTask, Cancelled};

/// Resource type of the root stack's own events.
pub const ROOT_STACK_RESOURCE_TYPE: &str = "AWS::CloudFormation::Stack";

/// Number of recent events surfaced for display.
pub const DEFAULT_EVENT_WINDOW: usize = 5;

/// Whether an event marks the end of a stack operation.
pub fn is_terminal_event(event: &StackEvent) -> bool {
    event.resource_type == ROOT_STACK_RESOURCE_TYPE
        && (event.resource_status.ends_with("COMPLETE")
            || event.resource_status.ends_with("FAILED"))
}

/// One observation of a stack's event history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackSnapshot {
    /// The most recent event, if the stack has any.
    pub latest: Option<StackEvent>,
    /// The newest `min(window, total)` events, newest first.
    pub recent: Vec<StackEvent>,
    pub total_events: usize,
}

impl StackSnapshot {
    /// Build from events ordered most recent first.
    pub fn from_events(mut events: Vec<StackEvent>, window: usize) -> Self {
        let total_events = events.len();
        let latest = events.first().cloned();
        events.truncate(window);
        Self {
            latest,
            recent: events,
            total_events,
        }
    }

    /// Terminal once the root stack settles. An empty history leaves nothing to wait for.
    pub fn is_terminal(&self) -> bool {
        self.latest.as_ref().is_none_or(is_terminal_event)
    }

    /// Normalised status from the newest root stack event.
    pub fn status(&self) -> DeploymentStatus {
        if self.total_events == 0 {
            return DeploymentStatus::Unstaged;
        }
        self.recent
            .iter()
            .find(|event| event.resource_type == ROOT_STACK_RESOURCE_TYPE)
            .map(|event| DeploymentStatus::from_stack_status(&event.resource_status))
            .unwrap_or(DeploymentStatus::InProgress)
    }
}

/// A stack mutation. The backend acknowledges it; completion is polled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackAction {
    Create(StackTemplate),
    Update(StackTemplate),
    Delete,
}

impl StackAction {
    /// Create a stack that was never deployed, otherwise update it.
    pub fn for_start(current_status: &str, template: StackTemplate) -> Self {
        match DeploymentStatus::from_stack_status(current_status) {
            DeploymentStatus::Unstaged => StackAction::Create(template),
            _ => StackAction::Update(template),
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            StackAction::Create(_) => "create",
            StackAction::Update(_) => "update",
            StackAction::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackPollSettings {
    pub interval: Duration,
    pub max_iterations: u32,
    pub event_window: usize,
    /// Transient fetch failures tolerated per session; zero fails fast.
    pub retry_attempts: u32,
}

impl Default for StackPollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_iterations: 720,
            event_window: DEFAULT_EVENT_WINDOW,
            retry_attempts: 0,
        }
    }
}

/// Stack status polling for one stack.
#[derive(Clone)]
pub struct StackStatusPoller {
    ops: Arc<dyn StackOps>,
    stack: StackRef,
    settings: StackPollSettings,
}

impl StackStatusPoller {
    pub fn new(ops: Arc<dyn StackOps>, stack: StackRef) -> Self {
        Self {
            ops,
            stack,
            settings: StackPollSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: StackPollSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn stack(&self) -> &StackRef {
        &self.stack
    }

    /// A single fetch, outside any poll session.
    pub async fn snapshot(&self) -> Result<StackSnapshot, OpsError> {
        let events = self.ops.describe_stack_events(&self.stack).await?;
        Ok(StackSnapshot::from_events(events, self.settings.event_window))
    }

    pub fn request(&self) -> PollRequest<StackSnapshot, OpsError> {
        let ops = Arc::clone(&self.ops);
        let stack = self.stack.clone();
        let window = self.settings.event_window;

        PollRequest::new(
            move || {
                let ops = Arc::clone(&ops);
                let stack = stack.clone();
                async move {
                    let events = ops.describe_stack_events(&stack).await?;
                    Ok(StackSnapshot::from_events(events, window))
                }
            },
            StackSnapshot::is_terminal,
        )
        .interval(self.settings.interval)
        .max_iterations(self.settings.max_iterations)
        .retry(RetryPolicy::transient(
            self.settings.retry_attempts,
            OpsError::is_transient,
        ))
    }

    /// Spawn a session and hand back its handle.
    pub fn watch<U>(&self, on_update: U) -> Result<PollHandle<StackSnapshot, OpsError>, PollError>
    where
        U: Fn(&StackSnapshot) + Send + Sync + 'static,
    {
        PollLoop::start(self.request().on_update(on_update))
    }

    /// Run a session on the caller's task.
    pub async fn poll<U>(
        &self,
        token: &CancelToken,
        on_update: U,
    ) -> Result<PollOutcome<StackSnapshot, OpsError>, PollError>
    where
        U: Fn(&StackSnapshot) + Send + Sync + 'static,
    {
        PollLoop::run(self.request().on_update(on_update), token).await
    }

    /// Send `action` and follow the stack until it settles.
    ///
    /// Cancelling while the acknowledgement is in flight yields `Cancelled`
    /// without polling.
    pub async fn launch<U>(
        &self,
        action: StackAction,
        token: &CancelToken,
        on_update: U,
    ) -> Result<PollOutcome<StackSnapshot, OpsError>, StatusError>
    where
        U: Fn(&StackSnapshot) + Send + Sync + 'static,
    {
        self.request().validate()?;

        let verb = action.verb();
        let ops = Arc::clone(&self.ops);
        let stack = self.stack.clone();
        let ack = CancellableTask::with_token(
            async move {
                match &action {
                    StackAction::Create(template) => ops.create_stack(&stack, template).await,
                    StackAction::Update(template) => ops.update_stack(&stack, template).await,
                    StackAction::Delete => ops.delete_stack(&stack).await,
                }
            },
            CancelPolicy::Rejecting,
            token.clone(),
        );

        match ack.result().await {
            Ok(result) => result?,
            Err(Cancelled) => return Ok(PollOutcome::Cancelled),
        }
        info!(stack = %self.stack.stack_name, action = verb, "stack operation acknowledged");

        Ok(self.poll(token, on_update).await?)
    }
}

impl std::fmt::Debug for StackStatusPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackStatusPoller")
            .field("stack", &self.stack)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
