// ABOUTME: The component record: what the app is, how it was provisioned, where it runs.
// ABOUTME: Stands in for the catalog's typed entity graph.

use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

use super::deserialize::{deserialize_app_name, deserialize_environments};
use crate::ops::{
    BackendParams, ClusterTarget, DeploymentQuery, ManifestSource, RepositoryInfo, StackRef,
    StackTemplate,
};
use crate::types::{AppName, EntityUid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    #[default]
    AwsApp,
    AwsResource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppSubtype {
    #[default]
    Ecs,
    Eks,
    ServerlessRestApi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IacType {
    Cdk,
    Terraform,
}

/// How the component's infrastructure was provisioned.
///
/// Unknown values are kept so that deleting such a component can fail with a
/// clear message instead of the whole config failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProvisioningState {
    CloudFormation,
    TerraformCloud,
    TerraformAws,
    Unsupported(String),
}

impl From<String> for ProvisioningState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "cloudformation" => ProvisioningState::CloudFormation,
            "terraform-cloud" => ProvisioningState::TerraformCloud,
            "terraform-aws" => ProvisioningState::TerraformAws,
            _ => ProvisioningState::Unsupported(value),
        }
    }
}

impl From<ProvisioningState> for String {
    fn from(state: ProvisioningState) -> Self {
        match state {
            ProvisioningState::CloudFormation => "cloudformation".to_string(),
            ProvisioningState::TerraformCloud => "terraform-cloud".to_string(),
            ProvisioningState::TerraformAws => "terraform-aws".to_string(),
            ProvisioningState::Unsupported(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    pub account: String,
    pub region: String,
    #[serde(default)]
    pub prefix: String,
}

/// How to reach the app inside an EKS cluster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EksConfig {
    /// Parameter whose value is the cluster ARN.
    pub cluster_parameter: String,
    pub namespace: String,
    pub admin_role_arn: String,
    pub kubectl_function_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvironmentConfig {
    pub name: String,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub stack_name: Option<String>,
    #[serde(default)]
    pub template: Option<StackTemplate>,
    #[serde(default)]
    pub eks: Option<EksConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(deserialize_with = "deserialize_app_name")]
    pub name: AppName,

    #[serde(default)]
    pub component_type: ComponentType,

    #[serde(default)]
    pub subtype: AppSubtype,

    pub iac_type: IacType,

    pub provisioning: ProvisioningState,

    pub entity_uid: EntityUid,

    /// `type:target` reference of the catalog location backing the entity.
    #[serde(default)]
    pub managed_by_location: Option<String>,

    #[serde(default)]
    pub repo_secret_arn: Option<String>,

    pub repository: RepositoryInfo,

    #[serde(deserialize_with = "deserialize_environments")]
    pub environments: NonEmpty<EnvironmentConfig>,
}

impl AppConfig {
    pub fn is_eks(&self) -> bool {
        self.subtype == AppSubtype::Eks
    }

    pub fn environment(&self, name: &str) -> Option<&EnvironmentConfig> {
        self.environments.iter().find(|env| env.name == name)
    }

    pub fn backend_params(&self, env: &EnvironmentConfig) -> BackendParams {
        BackendParams {
            app_name: self.name.to_string(),
            aws_account: env.provider.account.clone(),
            aws_region: env.provider.region.clone(),
            prefix: env.provider.prefix.clone(),
            provider_name: env.provider.name.clone(),
        }
    }

    pub fn stack_ref(&self, env: &EnvironmentConfig) -> Option<StackRef> {
        env.stack_name.as_ref().map(|stack_name| StackRef {
            backend: self.backend_params(env),
            component_name: self.name.to_string(),
            stack_name: stack_name.clone(),
        })
    }

    pub fn manifest_source(&self, env: &EnvironmentConfig) -> ManifestSource {
        ManifestSource {
            backend: self.backend_params(env),
            env_name: env.name.clone(),
            repository: self.repository.clone(),
        }
    }

    /// Deployment query for an EKS environment once its cluster name is known.
    pub fn deployment_query(
        &self,
        env: &EnvironmentConfig,
        eks: &EksConfig,
        cluster_name: String,
    ) -> DeploymentQuery {
        DeploymentQuery {
            target: ClusterTarget {
                backend: self.backend_params(env),
                cluster_name,
                role_arn: eks.admin_role_arn.clone(),
                kubectl_function: eks.kubectl_function_arn.clone(),
                namespace: eks.namespace.clone(),
            },
            env_name: env.name.clone(),
            app_name: self.name.to_string(),
        }
    }

    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for env in self.environments.iter() {
            if !seen.insert(env.name.as_str()) {
                problems.push(format!("environment '{}' is listed twice", env.name));
            }
            if self.is_eks() && env.eks.is_none() {
                problems.push(format!(
                    "environment '{}' needs an eks section for an EKS app",
                    env.name
                ));
            }
            if self.provisioning == ProvisioningState::CloudFormation && env.stack_name.is_none()
            {
                problems.push(format!(
                    "environment '{}' needs a stack_name for a CloudFormation app",
                    env.name
                ));
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisioning_state_keeps_unknown_values() {
        let state: ProvisioningState = serde_yaml::from_str("pulumi").unwrap();
        assert_eq!(state, ProvisioningState::Unsupported("pulumi".to_string()));

        let state: ProvisioningState = serde_yaml::from_str("terraform-cloud").unwrap();
        assert_eq!(state, ProvisioningState::TerraformCloud);
    }

    #[test]
    fn subtype_parses_kebab_case() {
        let subtype: AppSubtype = serde_yaml::from_str("serverless-rest-api").unwrap();
        assert_eq!(subtype, AppSubtype::ServerlessRestApi);
    }
}
