// ABOUTME: Teardown plans for platform entities: environment providers and environments.
// ABOUTME: Refuses while other catalog entities still depend on the one being removed.

use std::sync::Arc;

use super::{ResourceKind, TeardownError, TeardownPlan, TeardownStep};
use crate::ops::{BackendParams, CatalogOps, PlatformStackOps, RepositoryInfo, RepositoryOps};
use crate::types::EntityUid;

/// Catalog identity of an entity about to be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    pub uid: EntityUid,
    pub managed_by_location: Option<String>,
    /// Target refs of the entity's relations, e.g. `awsenvironment:default/dev`.
    pub relations: Vec<String>,
}

impl CatalogRecord {
    fn related(&self, prefixes: &[&str]) -> Vec<String> {
        self.relations
            .iter()
            .filter(|target| prefixes.iter().any(|prefix| target.starts_with(prefix)))
            .cloned()
            .collect()
    }
}

/// An environment provider: an account and region prepared for apps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRecord {
    pub name: String,
    pub backend: BackendParams,
    pub stack_name: String,
    pub access_role: String,
    pub repository: RepositoryInfo,
    pub catalog: CatalogRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentRecord {
    pub name: String,
    pub backend: BackendParams,
    pub repository: RepositoryInfo,
    pub catalog: CatalogRecord,
}

const ENVIRONMENT_REF: &str = "awsenvironment:";
const ENVIRONMENT_DEPENDENT_REFS: [&str; 3] =
    ["component:", "resource:", "awsenvironmentprovider:"];

/// Teardown plans for platform entities.
#[derive(Clone)]
pub struct PlatformTeardown {
    stacks: Arc<dyn PlatformStackOps>,
    repositories: Arc<dyn RepositoryOps>,
    catalog: Arc<dyn CatalogOps>,
}

impl PlatformTeardown {
    pub fn new(
        stacks: Arc<dyn PlatformStackOps>,
        repositories: Arc<dyn RepositoryOps>,
        catalog: Arc<dyn CatalogOps>,
    ) -> Self {
        Self {
            stacks,
            repositories,
            catalog,
        }
    }

    /// Delete a provider's stack, then its repository and catalog entry.
    pub fn provider_plan(&self, provider: &ProviderRecord) -> Result<TeardownPlan, TeardownError> {
        let environments = provider.catalog.related(&[ENVIRONMENT_REF]);
        if !environments.is_empty() {
            return Err(TeardownError::ProviderInUse {
                provider: provider.name.clone(),
                environments,
            });
        }

        let stacks = Arc::clone(&self.stacks);
        let backend = provider.backend.clone();
        let stack_name = provider.stack_name.clone();
        let access_role = provider.access_role.clone();
        let stack_step = TeardownStep::required(
            format!("infrastructure:{}", provider.name),
            ResourceKind::Infrastructure,
            move || async move {
                stacks
                    .delete_provider_stack(&backend, &stack_name, &access_role)
                    .await
            },
        );

        Ok(TeardownPlan::new()
            .step(stack_step)
            .step(self.repository_step(&provider.backend, &provider.repository))
            .step(self.catalog_step(&provider.catalog)))
    }

    /// Delete an environment's repository and catalog entry.
    pub fn environment_plan(
        &self,
        environment: &EnvironmentRecord,
    ) -> Result<TeardownPlan, TeardownError> {
        let dependents = environment.catalog.related(&ENVIRONMENT_DEPENDENT_REFS);
        if !dependents.is_empty() {
            return Err(TeardownError::EnvironmentInUse {
                environment: environment.name.clone(),
                dependents,
            });
        }

        Ok(TeardownPlan::new()
            .step(self.repository_step(&environment.backend, &environment.repository))
            .step(self.catalog_step(&environment.catalog)))
    }

    fn repository_step(
        &self,
        backend: &BackendParams,
        repository: &RepositoryInfo,
    ) -> TeardownStep {
        let repositories = Arc::clone(&self.repositories);
        let backend = backend.clone();
        let repository = repository.clone();
        TeardownStep::required("repository", ResourceKind::Repository, move || async move {
            repositories.delete_repository(&backend, &repository).await
        })
    }

    fn catalog_step(&self, record: &CatalogRecord) -> TeardownStep {
        let catalog = Arc::clone(&self.catalog);
        let location_ref = record.managed_by_location.clone();
        let uid = record.uid.clone();
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

impl std::fmt::Debug for PlatformTeardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformTeardown").finish_non_exhaustive()
    }
}
