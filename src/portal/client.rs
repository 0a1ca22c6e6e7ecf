// ABOUTME: PortalClient, the AWS-facing collaborators over the portal backend.
// ABOUTME: Each operation is one JSON POST under /api/aws-apps-backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::http::{self, Body};
use super::payload::decode_payload;
use super::requests::{
    EksConfigBody, InvokeBody, ParameterBody, ProviderStackBody, RepositoryBody, SecretBody,
    StackBody, StackEventsBody, TerraformDestroyBody, WithBackend,
};
use crate::ops::{
    BackendParams, Manifest, ManifestSource, OpsError, ParameterOps, PipelineOps,
    PlatformStackOps, RemoteCommand, RemoteCommandOps, RemoteCommandOutput, RepositoryInfo,
    RepositoryOps, SecretOps, StackEvent, StackOps, StackRef, StackTemplate, TerraformDestroy,
};

const API_PREFIX: &str = "/api/aws-apps-backend";

/// HTTP client for the developer-portal's AWS apps backend.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    api_url: String,
    /// Account context for platform-scoped calls such as secret deletion.
    platform: BackendParams,
}

#[derive(Debug, Deserialize)]
struct StackEventsReply {
    #[serde(rename = "StackEvents", default)]
    stack_events: Vec<StackEvent>,
}

#[derive(Debug, Deserialize)]
struct ParameterReply {
    #[serde(rename = "Parameter")]
    parameter: ParameterValue,
}

#[derive(Debug, Deserialize)]
struct ParameterValue {
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct InvokeReply {
    #[serde(rename = "Payload", default)]
    payload: Value,
    #[serde(rename = "FunctionError", default)]
    function_error: Option<String>,
}

impl PortalClient {
    /// `base_url` is the portal root, without the API prefix.
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        platform_app_name: impl Into<String>,
        platform_region: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_url: format!("{}{API_PREFIX}", base_url.trim_end_matches('/')),
            platform: BackendParams {
                app_name: platform_app_name.into(),
                aws_region: platform_region.into(),
                ..BackendParams::default()
            },
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn post<T: Serialize + Send>(
        &self,
        path: &str,
        backend: &BackendParams,
        body: T,
    ) -> Result<Body, OpsError> {
        let url = format!("{}{path}", self.api_url);
        let request = self.http.post(&url).json(&WithBackend { backend, body });
        http::send(path, request).await
    }
}

#[async_trait]
impl StackOps for PortalClient {
    async fn describe_stack_events(&self, stack: &StackRef) -> Result<Vec<StackEvent>, OpsError> {
        let path = "/cloudformation/describeStackEvents";
        let reply: StackEventsReply = self
            .post(
                path,
                &stack.backend,
                StackEventsBody {
                    stack_name: &stack.stack_name,
                },
            )
            .await?
            .parse(path)?;
        debug!(stack = %stack.stack_name, events = reply.stack_events.len(), "stack events");
        Ok(reply.stack_events)
    }

    async fn create_stack(
        &self,
        stack: &StackRef,
        template: &StackTemplate,
    ) -> Result<(), OpsError> {
        self.post(
            "/cloudformation/createStack",
            &stack.backend,
            stack_body(stack, Some(template)),
        )
        .await?;
        Ok(())
    }

    async fn update_stack(
        &self,
        stack: &StackRef,
        template: &StackTemplate,
    ) -> Result<(), OpsError> {
        self.post(
            "/cloudformation/updateStack",
            &stack.backend,
            stack_body(stack, Some(template)),
        )
        .await?;
        Ok(())
    }

    async fn delete_stack(&self, stack: &StackRef) -> Result<(), OpsError> {
        info!(stack = %stack.stack_name, "requesting stack deletion");
        self.post(
            "/cloudformation/deleteStack",
            &stack.backend,
            stack_body(stack, None),
        )
        .await?;
        Ok(())
    }
}

fn stack_body<'a>(stack: &'a StackRef, template: Option<&'a StackTemplate>) -> StackBody<'a> {
    StackBody {
        component_name: &stack.component_name,
        stack_name: &stack.stack_name,
        s3_bucket_name: template.map(|t| t.s3_bucket_name.as_str()),
        cf_file_name: template.map(|t| t.cf_file_name.as_str()),
    }
}

#[async_trait]
impl PipelineOps for PortalClient {
    async fn trigger_terraform_destroy(&self, request: &TerraformDestroy) -> Result<(), OpsError> {
        let repo = &request.repository;
        info!(env = %request.env_name, repo = %repo.name, "triggering terraform destroy");
        self.post(
            "/platform/delete-tf-provider",
            &request.backend,
            TerraformDestroyBody {
                git_host: &repo.host,
                git_repo_name: &repo.name,
                git_project_group: &repo.project_group,
                git_admin_secret: repo.admin_secret(),
                env_name: &request.env_name,
            },
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PlatformStackOps for PortalClient {
    async fn delete_provider_stack(
        &self,
        backend: &BackendParams,
        stack_name: &str,
        access_role: &str,
    ) -> Result<(), OpsError> {
        self.post(
            "/platform/delete-stack",
            backend,
            ProviderStackBody {
                stack_name,
                access_role,
            },
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SecretOps for PortalClient {
    async fn delete_secret(&self, secret_name: &str) -> Result<(), OpsError> {
        self.post(
            "/platform/delete-secret",
            &self.platform,
            SecretBody { secret_name },
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RepositoryOps for PortalClient {
    async fn fetch_manifests(&self, source: &ManifestSource) -> Result<Vec<Manifest>, OpsError> {
        let path = "/platform/fetch-eks-config";
        let body = self
            .post(
                path,
                &source.backend,
                EksConfigBody {
                    env_name: &source.env_name,
                    git_admin_secret: source.repository.admin_secret(),
                    scm: (&source.repository).into(),
                },
            )
            .await?;
        manifests_from(body.into_json()).map_err(|message| OpsError::invalid_response(path, message))
    }

    async fn delete_repository(
        &self,
        backend: &BackendParams,
        repository: &RepositoryInfo,
    ) -> Result<(), OpsError> {
        self.post(
            "/platform/delete-repository",
            backend,
            RepositoryBody {
                git_host: &repository.host,
                git_project: &repository.project_group,
                git_repo_name: &repository.name,
                git_admin_secret: repository.admin_secret(),
            },
        )
        .await?;
        Ok(())
    }
}

/// The config endpoint returns the manifests as a list or as an object of them.
fn manifests_from(value: Value) -> Result<Vec<Manifest>, String> {
    match value {
        Value::Array(items) => Ok(items.into_iter().map(Manifest::new).collect()),
        Value::Object(map) => Ok(map.into_iter().map(|(_, item)| Manifest::new(item)).collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(format!("expected manifests, got {other}")),
    }
}

#[async_trait]
impl ParameterOps for PortalClient {
    async fn get_parameter(&self, backend: &BackendParams, name: &str) -> Result<String, OpsError> {
        let path = "/ssm-parameter";
        let reply: ParameterReply = self
            .post(path, backend, ParameterBody { ssm_param_name: name })
            .await?
            .parse(path)?;
        Ok(reply.parameter.value)
    }
}

#[async_trait]
impl RemoteCommandOps for PortalClient {
    async fn invoke(&self, command: &RemoteCommand) -> Result<RemoteCommandOutput, OpsError> {
        let path = "/lambda/invoke";
        let reply: InvokeReply = self
            .post(
                path,
                &command.backend,
                InvokeBody {
                    function_name: &command.function,
                    action_description: &command.description,
                    body: &command.payload,
                },
            )
            .await?
            .parse(path)?;
        let payload = decode_payload(&reply.payload)
            .map_err(|message| OpsError::invalid_response(path, message))?;
        Ok(RemoteCommandOutput {
            payload,
            function_error: reply.function_error,
        })
    }
}
