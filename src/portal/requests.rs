// ABOUTME: JSON bodies posted to the portal backend.
// ABOUTME: Every body carries the flattened account context.

use serde::Serialize;

use crate::ops::{BackendParams, RepositoryInfo};

#[derive(Debug, Serialize)]
pub struct WithBackend<'a, T> {
    #[serde(flatten)]
    pub backend: &'a BackendParams,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackEventsBody<'a> {
    pub stack_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackBody<'a> {
    pub component_name: &'a str,
    pub stack_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_bucket_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cf_file_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStackBody<'a> {
    pub stack_name: &'a str,
    pub access_role: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerraformDestroyBody<'a> {
    pub git_host: &'a str,
    pub git_repo_name: &'a str,
    pub git_project_group: &'a str,
    pub git_admin_secret: &'a str,
    pub env_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretBody<'a> {
    pub secret_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryBody<'a> {
    pub git_host: &'a str,
    pub git_project: &'a str,
    pub git_repo_name: &'a str,
    pub git_admin_secret: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScmConfig<'a> {
    pub host: &'a str,
    pub project_group: &'a str,
    pub repo_name: &'a str,
}

impl<'a> From<&'a RepositoryInfo> for ScmConfig<'a> {
    fn from(repo: &'a RepositoryInfo) -> Self {
        Self {
            host: &repo.host,
            project_group: &repo.project_group,
            repo_name: &repo.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EksConfigBody<'a> {
    pub env_name: &'a str,
    pub git_admin_secret: &'a str,
    #[serde(rename = "platformSCMConfig")]
    pub scm: ScmConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterBody<'a> {
    pub ssm_param_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeBody<'a> {
    pub function_name: &'a str,
    pub action_description: &'a str,
    pub body: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn backend_block_is_flattened_next_to_body() {
        let backend = BackendParams {
            app_name: "orders".into(),
            aws_account: "123".into(),
            aws_region: "us-east-1".into(),
            prefix: "opa".into(),
            provider_name: "dev-provider".into(),
        };
        let body = WithBackend {
            backend: &backend,
            body: StackEventsBody {
                stack_name: "orders-dev",
            },
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "appName": "orders",
                "awsAccount": "123",
                "awsRegion": "us-east-1",
                "prefix": "opa",
                "providerName": "dev-provider",
                "stackName": "orders-dev"
            })
        );
    }

    #[test]
    fn delete_stack_body_omits_template() {
        let body = StackBody {
            component_name: "orders",
            stack_name: "orders-dev",
            s3_bucket_name: None,
            cf_file_name: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("s3BucketName").is_none());
        assert_eq!(value["componentName"], "orders");
    }
}
