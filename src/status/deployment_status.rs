// ABOUTME: Normalises raw stack and replica states into one small status set.
// ABOUTME: Also derives the running/stopped/updating view of a Kubernetes deployment.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ops::DeploymentObject;
use crate::types::DeploymentUid;

/// Pseudo-status of a stack whose template is uploaded but never deployed.
pub const STAGED: &str = "STAGED";
/// Pseudo-status of a stack with nothing uploaded yet.
pub const UNSTAGED: &str = "UNSTAGED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentStatus {
    Unstaged,
    InProgress,
    Live,
    Failed,
    Deleted,
}

impl DeploymentStatus {
    /// Map a CloudFormation stack status. Total: every string maps to something.
    pub fn from_stack_status(status: &str) -> Self {
        if status == STAGED || status == UNSTAGED {
            DeploymentStatus::Unstaged
        } else if status.ends_with("_COMPLETE") {
            if status.starts_with("DELETE") {
                DeploymentStatus::Deleted
            } else {
                DeploymentStatus::Live
            }
        } else if status.ends_with("_FAILED") {
            DeploymentStatus::Failed
        } else {
            DeploymentStatus::InProgress
        }
    }

    /// Map a deployment's replica counts. A missing ready count means none are ready.
    pub fn from_replicas(ready: Option<u32>, desired: u32) -> Self {
        match ready.unwrap_or(0) {
            0 => DeploymentStatus::Deleted,
            ready if ready == desired => DeploymentStatus::Live,
            _ => DeploymentStatus::InProgress,
        }
    }

    pub fn is_settled(self) -> bool {
        !matches!(self, DeploymentStatus::InProgress)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentStatus::Unstaged => "UNSTAGED",
            DeploymentStatus::InProgress => "IN_PROGRESS",
            DeploymentStatus::Live => "LIVE",
            DeploymentStatus::Failed => "FAILED",
            DeploymentStatus::Deleted => "DELETED",
        }
    }
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplicaState {
    Running,
    Stopped,
    Updating,
}

impl ReplicaState {
    /// Replicas not yet caught up count as pending; any pending means updating.
    pub fn from_counts(ready: u32, updated: u32) -> Self {
        if ready.abs_diff(updated) > 0 {
            ReplicaState::Updating
        } else if ready > 0 {
            ReplicaState::Running
        } else {
            ReplicaState::Stopped
        }
    }
}

impl std::fmt::Display for ReplicaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReplicaState::Running => "running",
            ReplicaState::Stopped => "stopped",
            ReplicaState::Updating => "updating",
        };
        f.write_str(s)
    }
}

/// Display view of one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppState {
    pub name: String,
    pub uid: DeploymentUid,
    pub state: ReplicaState,
    pub status: DeploymentStatus,
    pub desired: u32,
    pub running: u32,
    pub pending: u32,
    pub last_update: Option<DateTime<Utc>>,
}

impl From<&DeploymentObject> for AppState {
    fn from(object: &DeploymentObject) -> Self {
        let running = object.ready_replicas.unwrap_or(0);
        let updated = object.updated_replicas.unwrap_or(0);
        let desired = object.spec_replicas.unwrap_or(0);
        Self {
            name: object.name.clone(),
            uid: object.uid.clone(),
            state: ReplicaState::from_counts(running, updated),
            status: DeploymentStatus::from_replicas(object.ready_replicas, desired),
            desired,
            running,
            pending: running.abs_diff(updated),
            last_update: object
                .conditions
                .first()
                .and_then(|condition| condition.last_update_time),
        }
    }
}
