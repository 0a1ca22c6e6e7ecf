// ABOUTME: A single deletion step: what it removes, whether it gates the plan, and its action.
// ABOUTME: Actions run at most once and report failure through OpsError.

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::ops::OpsError;

/// The kind of resource a step removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Infrastructure,
    KubernetesApp,
    Secret,
    Repository,
    CatalogEntry,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResourceKind::Infrastructure => "infrastructure",
            ResourceKind::KubernetesApp => "kubernetes-app",
            ResourceKind::Secret => "secret",
            ResourceKind::Repository => "repository",
            ResourceKind::CatalogEntry => "catalog-entry",
        };
        f.write_str(s)
    }
}

type StepAction = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), OpsError>> + Send>;

/// Identity of a step, kept after its action has been consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StepInfo {
    pub id: String,
    pub kind: ResourceKind,
    pub required: bool,
}

/// One step of a [`super::TeardownPlan`].
///
/// A required step that fails halts the rest of the plan. An optional step
/// that fails is recorded and the plan moves on.
pub struct TeardownStep {
    info: StepInfo,
    action: StepAction,
}

impl TeardownStep {
    pub fn required<F, Fut>(id: impl Into<String>, kind: ResourceKind, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), OpsError>> + Send + 'static,
    {
        Self::new(id.into(), kind, true, action)
    }

    pub fn optional<F, Fut>(id: impl Into<String>, kind: ResourceKind, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), OpsError>> + Send + 'static,
    {
        Self::new(id.into(), kind, false, action)
    }

    fn new<F, Fut>(id: String, kind: ResourceKind, required: bool, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), OpsError>> + Send + 'static,
    {
        Self {
            info: StepInfo { id, kind, required },
            action: Box::new(move || action().boxed()),
        }
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.info.kind
    }

    pub fn is_required(&self) -> bool {
        self.info.required
    }

    pub(crate) fn into_parts(self) -> (StepInfo, StepAction) {
        (self.info, self.action)
    }
}

impl std::fmt::Debug for TeardownStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeardownStep")
            .field("id", &self.info.id)
            .field("kind", &self.info.kind)
            .field("required", &self.info.required)
            .finish_non_exhaustive()
    }
}
