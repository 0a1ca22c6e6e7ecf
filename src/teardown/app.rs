// ABOUTME: Builds teardown plans for an application, per environment or across all of them.
// ABOUTME: Steps call collaborators only; ordering and required-ness live here.

use std::sync::Arc;

use super::manifests::prepare_for_deletion;
use super::{ResourceKind, TeardownError, TeardownPlan, TeardownStep};
use crate::config::{AppConfig, ComponentType, EnvironmentConfig, IacType, ProvisioningState};
use crate::kubectl::resolve_cluster_name;
use crate::ops::{Collaborators, OpsError, TerraformDestroy};

/// Shown when a Terraform app's repository must outlive its destroy pipeline.
pub const TERRAFORM_REPOSITORY_NOTICE: &str =
    "Once the destroy pipeline finishes executing you may delete the repository";

/// Teardown plans for one application.
#[derive(Clone)]
pub struct AppTeardown {
    app: Arc<AppConfig>,
    ops: Collaborators,
}

impl AppTeardown {
    pub fn new(app: Arc<AppConfig>, ops: Collaborators) -> Self {
        Self { app, ops }
    }

    /// Remove the app from one environment.
    ///
    /// The infrastructure deletion is only acknowledged, not awaited; follow it
    /// with a stack poller.
    pub fn environment_plan(&self, env_name: &str) -> Result<TeardownPlan, TeardownError> {
        let env = self
            .app
            .environment(env_name)
            .ok_or_else(|| TeardownError::UnknownEnvironment(env_name.to_string()))?;

        let mut plan = TeardownPlan::new();
        if self.deletes_kubernetes_objects() {
            plan.push(self.kubernetes_step(env));
        }
        plan.push(self.infrastructure_step(env, true));
        Ok(plan)
    }

    /// Remove the app from every environment and then deregister it.
    ///
    /// Environments run concurrently. Within one, cluster objects go before
    /// the infrastructure that holds the role used to delete them.
    pub fn all_environments_plan(&self) -> TeardownPlan {
        let lanes = self
            .app
            .environments
            .iter()
            .map(|env| {
                let mut lane = Vec::with_capacity(2);
                if self.deletes_kubernetes_objects() {
                    lane.push(self.kubernetes_step(env));
                }
                lane.push(self.infrastructure_step(env, false));
                lane
            })
            .collect();
        let mut plan = TeardownPlan::new().lanes(lanes);

        match self.app.iac_type {
            IacType::Cdk => {
                plan.push(self.repository_step());
                if let Some(step) = self.secret_step() {
                    plan.push(step);
                }
                plan.push(self.catalog_step());
                plan
            }
            IacType::Terraform => plan.notice(TERRAFORM_REPOSITORY_NOTICE),
        }
    }

    /// Terraform Cloud workspaces own their cluster objects.
    fn deletes_kubernetes_objects(&self) -> bool {
        self.app.is_eks() && self.app.provisioning != ProvisioningState::TerraformCloud
    }

    fn infrastructure_step(&self, env: &EnvironmentConfig, required: bool) -> TeardownStep {
        let id = format!("infrastructure:{}", env.name);
        let app = Arc::clone(&self.app);
        let ops = self.ops.clone();
        let env = env.clone();
        let action = move || async move { delete_infrastructure(&app, &ops, &env).await };

        if required {
            TeardownStep::required(id, ResourceKind::Infrastructure, action)
        } else {
            TeardownStep::optional(id, ResourceKind::Infrastructure, action)
        }
    }

    fn kubernetes_step(&self, env: &EnvironmentConfig) -> TeardownStep {
        let app = Arc::clone(&self.app);
        let ops = self.ops.clone();
        let env = env.clone();
        TeardownStep::required(
            format!("kubernetes:{}", env.name),
            ResourceKind::KubernetesApp,
            move || async move { delete_kubernetes_app(&app, &ops, &env).await },
        )
    }

    fn repository_step(&self) -> TeardownStep {
        let repositories = Arc::clone(&self.ops.repositories);
        let app = Arc::clone(&self.app);
        TeardownStep::optional("repository", ResourceKind::Repository, move || async move {
            let backend = app.backend_params(app.environments.first());
            repositories
                .delete_repository(&backend, &app.repository)
                .await
        })
    }

    fn secret_step(&self) -> Option<TeardownStep> {
        if self.app.component_type != ComponentType::AwsApp {
            return None;
        }
        let secret = self.app.repo_secret_arn.clone()?;
        let secrets = Arc::clone(&self.ops.secrets);
        Some(TeardownStep::required(
            "secret",
            ResourceKind::Secret,
            move || async move { secrets.delete_secret(&secret).await },
        ))
    }

    fn catalog_step(&self) -> TeardownStep {
        let catalog = Arc::clone(&self.ops.catalog);
        let location_ref = self.app.managed_by_location.clone();
        let uid = self.app.entity_uid.clone();
        TeardownStep::required("catalog", ResourceKind::CatalogEntry, move || async move {
            if let Some(location_ref) = location_ref
                && let Some(location) = catalog.location_by_ref(&location_ref).await?
            {
                catalog.remove_location(&location).await?;
            }
            catalog.remove_entity(&uid).await
        })
    }
}

impl std::fmt::Debug for AppTeardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppTeardown")
            .field("app", &self.app.name)
            .finish_non_exhaustive()
    }
}

async fn delete_infrastructure(
    app: &AppConfig,
    ops: &Collaborators,
    env: &EnvironmentConfig,
) -> Result<(), OpsError> {
    match &app.provisioning {
        ProvisioningState::CloudFormation => {
            let stack = app.stack_ref(env).ok_or_else(|| {
                OpsError::Unsupported(format!("environment '{}' has no stack name", env.name))
            })?;
            ops.stacks.delete_stack(&stack).await
        }
        ProvisioningState::TerraformCloud | ProvisioningState::TerraformAws => {
            let request = TerraformDestroy {
                backend: app.backend_params(env),
                env_name: env.name.clone(),
                repository: app.repository.clone(),
            };
            ops.pipelines.trigger_terraform_destroy(&request).await
        }
        ProvisioningState::Unsupported(state) => Err(OpsError::Unsupported(format!(
            "can't delete component: unsupported provisioning state '{state}'"
        ))),
    }
}

async fn delete_kubernetes_app(
    app: &AppConfig,
    ops: &Collaborators,
    env: &EnvironmentConfig,
) -> Result<(), OpsError> {
    let eks = env.eks.as_ref().ok_or_else(|| {
        OpsError::Unsupported(format!("environment '{}' has no eks section", env.name))
    })?;

    let manifests = ops
        .repositories
        .fetch_manifests(&app.manifest_source(env))
        .await?;
    let manifests = prepare_for_deletion(manifests);
    if manifests.is_empty() {
        return Ok(());
    }

    let backend = app.backend_params(env);
    let cluster_name =
        resolve_cluster_name(ops.parameters.as_ref(), &backend, &eks.cluster_parameter).await?;
    let query = app.deployment_query(env, eks, cluster_name);
    let description = format!("Delete app from namespace {}", eks.namespace);
    ops.cluster
        .delete_manifests(&query.target, &manifests, &description)
        .await
}
