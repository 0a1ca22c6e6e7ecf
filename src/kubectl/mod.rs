// ABOUTME: Cluster access through the remote kubectl function.
// ABOUTME: Implements ClusterOps on top of any RemoteCommandOps.

mod objects;
mod request;

pub use objects::parse_deployments;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::ops::{
    BackendParams, ClusterOps, ClusterTarget, DeploymentObject, DeploymentQuery, Manifest,
    OpsError, ParameterOps, RemoteCommand, RemoteCommandOps,
};

/// Look up the cluster name from the parameter holding the cluster ARN
/// (`arn:aws:eks:<region>:<account>:cluster/<name>`).
pub async fn resolve_cluster_name(
    parameters: &dyn ParameterOps,
    backend: &BackendParams,
    parameter: &str,
) -> Result<String, OpsError> {
    let value = parameters.get_parameter(backend, parameter).await?;
    value
        .split('/')
        .nth(1)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            OpsError::invalid_response(
                parameter,
                format!("'{value}' does not look like a cluster ARN"),
            )
        })
}

/// [`ClusterOps`] over a remote kubectl function.
#[derive(Debug, Clone)]
pub struct KubectlCluster<R> {
    remote: R,
}

impl<R: RemoteCommandOps> KubectlCluster<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    async fn invoke<P: Serialize + Sync>(
        &self,
        target: &ClusterTarget,
        description: &str,
        request: &P,
    ) -> Result<Vec<u8>, OpsError> {
        let payload = serde_json::to_string(request).map_err(|e| {
            OpsError::invalid_response(target.kubectl_function.as_str(), e.to_string())
        })?;
        let command = RemoteCommand {
            backend: target.backend.clone(),
            function: target.kubectl_function.clone(),
            description: description.to_string(),
            payload,
        };
        debug!(function = %command.function, description, "invoking kubectl");

        let output = self.remote.invoke(&command).await?;
        if let Some(message) = output.function_error {
            return Err(OpsError::RemoteFunction {
                function: command.function,
                message,
            });
        }
        Ok(output.payload)
    }
}

#[async_trait]
impl<R: RemoteCommandOps> ClusterOps for KubectlCluster<R> {
    async fn list_deployment_objects(
        &self,
        query: &DeploymentQuery,
    ) -> Result<Vec<DeploymentObject>, OpsError> {
        let request = request::list_objects(&query.target, "deployments", query.label_selector());
        let description = format!("Fetch deployments for namespace {}", query.target.namespace);
        let payload = self.invoke(&query.target, &description, &request).await?;

        parse_deployments(&payload).map_err(|e| {
            OpsError::invalid_response(query.target.kubectl_function.as_str(), e.to_string())
        })
    }

    async fn delete_manifests(
        &self,
        target: &ClusterTarget,
        manifests: &[Manifest],
        description: &str,
    ) -> Result<(), OpsError> {
        let request = request::delete_manifests(target, manifests).map_err(|e| {
            OpsError::invalid_response(target.kubectl_function.as_str(), e.to_string())
        })?;
        self.invoke(target, description, &request).await?;
        Ok(())
    }

    async fn apply_manifests(
        &self,
        target: &ClusterTarget,
        manifests: &[Manifest],
        description: &str,
    ) -> Result<(), OpsError> {
        let request = request::update_manifests(target, manifests).map_err(|e| {
            OpsError::invalid_response(target.kubectl_function.as_str(), e.to_string())
        })?;
        self.invoke(target, description, &request).await?;
        Ok(())
    }
}
