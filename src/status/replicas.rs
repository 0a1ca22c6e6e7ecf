// ABOUTME: Polls a Kubernetes deployment's replica counts until it is running or stopped.
// ABOUTME: The terminal predicate is chosen per call since start and stop are opposites.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::{AppState, StatusError};
use crate::ops::{
    ClusterOps, DeploymentObject, DeploymentQuery, ManifestSource, OpsError, RepositoryOps,
};
use crate::poll::{PollError, PollLoop, PollOutcome, PollRequest, RetryPolicy};
use crate::task::{CancelPolicy, CancelToken, CancellableTask, Cancelled};
use crate::types::DeploymentUid;

/// What the caller is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplicaTarget {
    Start,
    Stop,
}

impl ReplicaTarget {
    /// Whether the tracked deployment has reached this target. A deployment
    /// that is not listed has reached neither.
    pub fn is_reached(self, deployment: Option<&DeploymentObject>) -> bool {
        let Some(deployment) = deployment else {
            return false;
        };
        let ready = deployment.ready_replicas.unwrap_or(0);
        match self {
            ReplicaTarget::Start => ready > 0,
            ReplicaTarget::Stop => ready == 0,
        }
    }

    /// Replica count to request. Starting never asks for zero.
    pub fn replicas(self, desired: u32) -> u32 {
        match self {
            ReplicaTarget::Start => desired.max(1),
            ReplicaTarget::Stop => 0,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            ReplicaTarget::Start => "Starting",
            ReplicaTarget::Stop => "Stopping",
        }
    }
}

/// One observation of the tracked deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicaSnapshot {
    pub deployment: Option<DeploymentObject>,
}

impl ReplicaSnapshot {
    fn select(objects: Vec<DeploymentObject>, uid: &DeploymentUid) -> Self {
        Self {
            deployment: objects.into_iter().find(|object| &object.uid == uid),
        }
    }

    pub fn app_state(&self) -> Option<AppState> {
        self.deployment.as_ref().map(AppState::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaPollSettings {
    pub start_interval: Duration,
    pub stop_interval: Duration,
    pub max_iterations: u32,
    pub retry_attempts: u32,
}

impl ReplicaPollSettings {
    pub fn interval(&self, target: ReplicaTarget) -> Duration {
        match target {
            ReplicaTarget::Start => self.start_interval,
            ReplicaTarget::Stop => self.stop_interval,
        }
    }
}

impl Default for ReplicaPollSettings {
    fn default() -> Self {
        Self {
            start_interval: Duration::from_secs(5),
            stop_interval: Duration::from_secs(7),
            max_iterations: 120,
            retry_attempts: 0,
        }
    }
}

/// Replica status polling for one app's deployments in one environment.
#[derive(Clone)]
pub struct ReplicaStatusPoller {
    cluster: Arc<dyn ClusterOps>,
    query: DeploymentQuery,
    settings: ReplicaPollSettings,
}

impl ReplicaStatusPoller {
    pub fn new(cluster: Arc<dyn ClusterOps>, query: DeploymentQuery) -> Self {
        Self {
            cluster,
            query,
            settings: ReplicaPollSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ReplicaPollSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn query(&self) -> &DeploymentQuery {
        &self.query
    }

    /// Current state of every deployment matching the app's labels.
    pub async fn app_states(&self) -> Result<Vec<AppState>, OpsError> {
        let objects = self.cluster.list_deployment_objects(&self.query).await?;
        Ok(objects.iter().map(AppState::from).collect())
    }

    pub fn request(
        &self,
        uid: DeploymentUid,
        target: ReplicaTarget,
    ) -> PollRequest<ReplicaSnapshot, OpsError> {
        let cluster = Arc::clone(&self.cluster);
        let query = self.query.clone();

        PollRequest::new(
            move || {
                let cluster = Arc::clone(&cluster);
                let query = query.clone();
                let uid = uid.clone();
                async move {
                    let objects = cluster.list_deployment_objects(&query).await?;
                    Ok(ReplicaSnapshot::select(objects, &uid))
                }
            },
            move |snapshot: &ReplicaSnapshot| target.is_reached(snapshot.deployment.as_ref()),
        )
        .interval(self.settings.interval(target))
        .max_iterations(self.settings.max_iterations)
        .retry(RetryPolicy::transient(
            self.settings.retry_attempts,
            OpsError::is_transient,
        ))
    }

    pub async fn poll<U>(
        &self,
        uid: DeploymentUid,
        target: ReplicaTarget,
        token: &CancelToken,
        on_update: U,
    ) -> Result<PollOutcome<ReplicaSnapshot, OpsError>, PollError>
    where
        U: Fn(&ReplicaSnapshot) + Send + Sync + 'static,
    {
        PollLoop::run(self.request(uid, target).on_update(on_update), token).await
    }

    /// Rewrite the app's replica count through `scaler`, then poll until the
    /// deployment reaches `target`.
    pub async fn scale<U>(
        &self,
        scaler: &ReplicaScaler,
        uid: DeploymentUid,
        target: ReplicaTarget,
        desired: u32,
        token: &CancelToken,
        on_update: U,
    ) -> Result<PollOutcome<ReplicaSnapshot, OpsError>, StatusError>
    where
        U: Fn(&ReplicaSnapshot) + Send + Sync + 'static,
    {
        let request = self.request(uid, target).on_update(on_update);
        request.validate()?;

        let replicas = target.replicas(desired);
        let description = format!(
            "{} app in environment {}",
            target.verb(),
            self.query.env_name
        );
        let scaler = scaler.clone();
        let cluster = Arc::clone(&self.cluster);
        let query = self.query.clone();
        let update = CancellableTask::with_token(
            async move {
                scaler
                    .set_replicas(cluster.as_ref(), &query, replicas, &description)
                    .await
            },
            CancelPolicy::Rejecting,
            token.clone(),
        );

        match update.result().await {
            Ok(scaled) => {
                let scaled = scaled?;
                info!(env = %self.query.env_name, replicas, scaled, "replica update applied");
            }
            Err(Cancelled) => return Ok(PollOutcome::Cancelled),
        }

        Ok(PollLoop::run(request, token).await?)
    }
}

impl std::fmt::Debug for ReplicaStatusPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicaStatusPoller")
            .field("query", &self.query)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Rewrites `spec.replicas` in an environment's committed manifests and
/// applies them.
#[derive(Clone)]
pub struct ReplicaScaler {
    repository: Arc<dyn RepositoryOps>,
    source: ManifestSource,
}

impl ReplicaScaler {
    pub fn new(repository: Arc<dyn RepositoryOps>, source: ManifestSource) -> Self {
        Self { repository, source }
    }

    /// Returns how many objects declared a replica count.
    pub async fn set_replicas(
        &self,
        cluster: &dyn ClusterOps,
        query: &DeploymentQuery,
        replicas: u32,
        description: &str,
    ) -> Result<usize, OpsError> {
        let mut manifests = self.repository.fetch_manifests(&self.source).await?;
        let scaled = manifests
            .iter_mut()
            .map(|manifest| manifest.set_replicas(replicas))
            .filter(|changed| *changed)
            .count();
        cluster
            .apply_manifests(&query.target, &manifests, description)
            .await?;
        Ok(scaled)
    }
}

impl std::fmt::Debug for ReplicaScaler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicaScaler")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
