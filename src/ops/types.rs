// ABOUTME: Data shapes exchanged with collaborators.
// ABOUTME: Account context, stack references, stack events, repositories, manifests, deployments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::DeploymentUid;

/// Account context sent with every AWS-facing backend call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendParams {
    pub app_name: String,
    pub aws_account: String,
    pub aws_region: String,
    pub prefix: String,
    pub provider_name: String,
}

/// A CloudFormation stack owned by one component in one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRef {
    pub backend: BackendParams,
    pub component_name: String,
    pub stack_name: String,
}

/// Where the template for a stack create or update lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackTemplate {
    pub s3_bucket_name: String,
    pub cf_file_name: String,
}

/// One entry of a stack's event history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackEvent {
    pub resource_type: String,
    pub resource_status: String,
    #[serde(rename = "LogicalResourceId", default)]
    pub logical_id: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_status_reason: Option<String>,
}

impl StackEvent {
    pub fn new(
        resource_type: impl Into<String>,
        resource_status: impl Into<String>,
        logical_id: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_status: resource_status.into(),
            logical_id: logical_id.into(),
            timestamp: None,
            resource_status_reason: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitProvider {
    Gitlab,
    Github,
}

/// Source repository of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub provider: GitProvider,
    pub host: String,
    pub project_group: String,
    pub name: String,
}

impl RepositoryInfo {
    /// Name of the platform secret holding the git admin credentials.
    pub fn admin_secret(&self) -> &'static str {
        match self.provider {
            GitProvider::Gitlab => "opa-admin-gitlab-secrets",
            GitProvider::Github => "opa-admin-github-secrets",
        }
    }
}

/// The environment config directory of a component's repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSource {
    pub backend: BackendParams,
    pub env_name: String,
    pub repository: RepositoryInfo,
}

/// A Kubernetes object as stored in the environment's deployment config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(serde_json::Value);

impl Manifest {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind").and_then(serde_json::Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.pointer("/metadata/name").and_then(serde_json::Value::as_str)
    }

    /// The namespace, treating an empty string as absent.
    pub fn namespace(&self) -> Option<&str> {
        self.0
            .pointer("/metadata/namespace")
            .and_then(serde_json::Value::as_str)
            .filter(|ns| !ns.is_empty())
    }

    /// Overwrite `spec.replicas` if the object declares it.
    pub fn set_replicas(&mut self, replicas: u32) -> bool {
        match self.0.pointer_mut("/spec/replicas") {
            Some(slot) => {
                *slot = serde_json::Value::from(replicas);
                true
            }
            None => false,
        }
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// Everything needed to reach a cluster through the kubectl function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterTarget {
    pub backend: BackendParams,
    pub cluster_name: String,
    pub role_arn: String,
    pub kubectl_function: String,
    pub namespace: String,
}

/// Deployment objects of one app in one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentQuery {
    pub target: ClusterTarget,
    pub env_name: String,
    pub app_name: String,
}

impl DeploymentQuery {
    pub fn label_selector(&self) -> String {
        format!(
            "app.kubernetes.io/env={},app.kubernetes.io/name={}",
            self.env_name, self.app_name
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentCondition {
    pub kind: String,
    pub status: String,
    pub last_update_time: Option<DateTime<Utc>>,
}

/// Replica view of a Kubernetes Deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentObject {
    pub uid: DeploymentUid,
    pub name: String,
    pub spec_replicas: Option<u32>,
    pub ready_replicas: Option<u32>,
    pub updated_replicas: Option<u32>,
    pub conditions: Vec<DeploymentCondition>,
}

/// Raw reply of a remote function invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteCommandOutput {
    pub payload: Vec<u8>,
    pub function_error: Option<String>,
}

/// A remote function call, addressed in an account context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    pub backend: BackendParams,
    pub function: String,
    pub description: String,
    pub payload: String,
}
