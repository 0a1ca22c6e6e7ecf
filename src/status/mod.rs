// ABOUTME: Domain status pollers for CloudFormation stacks and Kubernetes replicas.
// ABOUTME: Normalises upstream states and tracks each poller's lifecycle.

mod deployment_status;
mod machine;
mod replicas;
mod stack;

pub use deployment_status::{AppState, DeploymentStatus, ReplicaState, STAGED, UNSTAGED};
pub use machine::{PollerEvent, PollerState};
pub use replicas::{
    ReplicaPollSettings, ReplicaScaler, ReplicaSnapshot, ReplicaStatusPoller, ReplicaTarget,
};
pub use stack::{
    DEFAULT_EVENT_WINDOW, ROOT_STACK_RESOURCE_TYPE, StackAction, StackPollSettings,
    StackSnapshot, StackStatusPoller, is_terminal_event,
};

use crate::ops::OpsError;
use crate::poll::PollError;

/// Failure to launch a status-changing operation.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error(transparent)]
    Ops(#[from] OpsError),

    #[error(transparent)]
    Poll(#[from] PollError),
}
