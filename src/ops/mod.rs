// ABOUTME: Collaborator interfaces for every external system the core touches.
// ABOUTME: Polling and teardown call these traits, never a client directly.

mod catalog;
mod cluster;
mod collaborators;
mod error;
mod platform;
mod stack;
mod types;

pub use catalog::CatalogOps;
pub use cluster::{ClusterOps, RemoteCommandOps};
pub use collaborators::Collaborators;
pub use error::OpsError;
pub use platform::{ParameterOps, PlatformStackOps, RepositoryOps, SecretOps};
pub use stack::{PipelineOps, StackOps, TerraformDestroy};
pub use types::{
    BackendParams, ClusterTarget, DeploymentCondition, DeploymentObject, DeploymentQuery,
    GitProvider, Manifest, ManifestSource, RemoteCommand, RemoteCommandOutput, RepositoryInfo,
    StackEvent, StackRef, StackTemplate,
};
