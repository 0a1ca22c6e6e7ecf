// ABOUTME: Platform-level operations: secrets, repositories, parameters, platform stacks.
// ABOUTME: Used by teardown plans and cluster name resolution.

use async_trait::async_trait;

use super::{BackendParams, Manifest, ManifestSource, OpsError, RepositoryInfo};

#[async_trait]
pub trait SecretOps: Send + Sync {
    async fn delete_secret(&self, secret_name: &str) -> Result<(), OpsError>;
}

#[async_trait]
pub trait RepositoryOps: Send + Sync {
    /// Kubernetes manifests committed for one environment.
    async fn fetch_manifests(&self, source: &ManifestSource) -> Result<Vec<Manifest>, OpsError>;

    async fn delete_repository(
        &self,
        backend: &BackendParams,
        repository: &RepositoryInfo,
    ) -> Result<(), OpsError>;
}

#[async_trait]
pub trait ParameterOps: Send + Sync {
    async fn get_parameter(&self, backend: &BackendParams, name: &str)
    -> Result<String, OpsError>;
}

/// Stacks that provision platform providers.
#[async_trait]
pub trait PlatformStackOps: Send + Sync {
    /// Delete the provider stack, assuming `access_role` to do so.
    async fn delete_provider_stack(
        &self,
        backend: &BackendParams,
        stack_name: &str,
        access_role: &str,
    ) -> Result<(), OpsError>;
}
