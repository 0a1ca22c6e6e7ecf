// ABOUTME: The full set of collaborators a command needs, shared behind Arcs.
// ABOUTME: Production wires the portal adapters in; tests wire fakes.

use std::sync::Arc;

use super::{
    CatalogOps, ClusterOps, ParameterOps, PipelineOps, PlatformStackOps, RepositoryOps, SecretOps,
    StackOps,
};

#[derive(Clone)]
pub struct Collaborators {
    pub stacks: Arc<dyn StackOps>,
    pub pipelines: Arc<dyn PipelineOps>,
    pub platform_stacks: Arc<dyn PlatformStackOps>,
    pub cluster: Arc<dyn ClusterOps>,
    pub parameters: Arc<dyn ParameterOps>,
    pub secrets: Arc<dyn SecretOps>,
    pub repositories: Arc<dyn RepositoryOps>,
    pub catalog: Arc<dyn CatalogOps>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
