// ABOUTME: Ordered multi-resource deletion with per-step outcome reporting.
// ABOUTME: Plans for apps and platform entities, plus the orchestrator that runs them.

mod app;
mod manifests;
mod orchestrator;
mod plan;
mod platform;
mod report;
mod step;

pub use app::{AppTeardown, TERRAFORM_REPOSITORY_NOTICE};
pub use manifests::{kind_order, prepare_for_deletion};
pub use orchestrator::TeardownOrchestrator;
pub use plan::TeardownPlan;
pub use platform::{CatalogRecord, EnvironmentRecord, PlatformTeardown, ProviderRecord};
pub use report::{StepResult, TeardownReport};
pub use step::{ResourceKind, TeardownStep};

/// A plan that cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TeardownError {
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error(
        "provider {provider} is still associated with environments ({}); disassociate them first",
        .environments.join(", ")
    )]
    ProviderInUse {
        provider: String,
        environments: Vec<String>,
    },

    #[error(
        "environment {environment} still has providers, apps or resources ({}); delete them first",
        .dependents.join(", ")
    )]
    EnvironmentInUse {
        environment: String,
        dependents: Vec<String>,
    },
}
