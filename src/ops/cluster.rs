// ABOUTME: Cluster and remote-command operations.
// ABOUTME: Kubernetes access goes through a remote kubectl function, never a direct API client.

use async_trait::async_trait;

use super::{
    ClusterTarget, DeploymentObject, DeploymentQuery, Manifest, OpsError, RemoteCommand,
    RemoteCommandOutput,
};

/// Invocation of a remote function (used to both read and mutate cluster objects).
#[async_trait]
pub trait RemoteCommandOps: Send + Sync {
    async fn invoke(&self, command: &RemoteCommand) -> Result<RemoteCommandOutput, OpsError>;
}

/// Kubernetes objects of a deployed app.
#[async_trait]
pub trait ClusterOps: Send + Sync {
    async fn list_deployment_objects(
        &self,
        query: &DeploymentQuery,
    ) -> Result<Vec<DeploymentObject>, OpsError>;

    /// Delete the manifests in the order given.
    async fn delete_manifests(
        &self,
        target: &ClusterTarget,
        manifests: &[Manifest],
        description: &str,
    ) -> Result<(), OpsError>;

    /// Apply updated manifests.
    async fn apply_manifests(
        &self,
        target: &ClusterTarget,
        manifests: &[Manifest],
        description: &str,
    ) -> Result<(), OpsError>;
}
