// ABOUTME: Stack and pipeline operations: describe events, create, update, delete.
// ABOUTME: Mutations return an acknowledgement only; completion is observed by polling.

use async_trait::async_trait;

use super::{BackendParams, OpsError, RepositoryInfo, StackEvent, StackRef, StackTemplate};

/// CloudFormation stack lifecycle.
#[async_trait]
pub trait StackOps: Send + Sync {
    /// Events for the stack, most recent first.
    async fn describe_stack_events(&self, stack: &StackRef) -> Result<Vec<StackEvent>, OpsError>;

    async fn create_stack(&self, stack: &StackRef, template: &StackTemplate)
    -> Result<(), OpsError>;

    async fn update_stack(&self, stack: &StackRef, template: &StackTemplate)
    -> Result<(), OpsError>;

    async fn delete_stack(&self, stack: &StackRef) -> Result<(), OpsError>;
}

/// Request to destroy an environment's Terraform-managed infrastructure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerraformDestroy {
    pub backend: BackendParams,
    pub env_name: String,
    pub repository: RepositoryInfo,
}

/// Terraform pipelines that tear infrastructure down asynchronously.
#[async_trait]
pub trait PipelineOps: Send + Sync {
    /// Commit the destroy trigger; the pipeline does the rest.
    async fn trigger_terraform_destroy(&self, request: &TerraformDestroy) -> Result<(), OpsError>;
}
