// ABOUTME: In-memory stand-in for every collaborator trait.
// ABOUTME: Records each call by name and fails the ones a test marks as failing.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use harmonia::ops::{
    BackendParams, CatalogOps, ClusterOps, ClusterTarget, Collaborators, DeploymentObject,
    DeploymentQuery, Manifest, ManifestSource, OpsError, ParameterOps, PipelineOps,
    PlatformStackOps, RepositoryInfo, RepositoryOps, SecretOps, StackEvent, StackOps, StackRef,
    StackTemplate, TerraformDestroy,
};
use harmonia::types::{DeploymentUid, EntityUid, LocationId};
use parking_lot::Mutex;

/// Replies handed out one per call; the last one repeats.
#[derive(Debug)]
struct Script<T> {
    replies: VecDeque<Result<T, OpsError>>,
}

impl<T: Clone> Script<T> {
    fn new(initial: T) -> Self {
        Self {
            replies: VecDeque::from([Ok(initial)]),
        }
    }

    fn next(&mut self) -> Result<T, OpsError> {
        if self.replies.len() > 1 {
            self.replies.pop_front().expect("script has replies")
        } else {
            self.replies.front().cloned().expect("script has replies")
        }
    }
}

#[derive(Debug)]
pub struct FakePlatform {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashMap<String, OpsError>>,
    stack_events: Mutex<Script<Vec<StackEvent>>>,
    deployments: Mutex<Script<Vec<DeploymentObject>>>,
    manifests: Mutex<Vec<Manifest>>,
    deleted_manifests: Mutex<Vec<Vec<Manifest>>>,
    applied_manifests: Mutex<Vec<Vec<Manifest>>>,
    parameter: Mutex<String>,
    locations: Mutex<HashMap<String, LocationId>>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashMap::new()),
            stack_events: Mutex::new(Script::new(Vec::new())),
            deployments: Mutex::new(Script::new(Vec::new())),
            manifests: Mutex::new(Vec::new()),
            deleted_manifests: Mutex::new(Vec::new()),
            applied_manifests: Mutex::new(Vec::new()),
            parameter: Mutex::new("arn:aws:eks:us-east-1:111111111111:cluster/opa-dev".into()),
            locations: Mutex::new(HashMap::new()),
        }
    }
}

impl FakePlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn collaborators(self: &Arc<Self>) -> Collaborators {
        Collaborators {
            stacks: self.clone(),
            pipelines: self.clone(),
            platform_stacks: self.clone(),
            cluster: self.clone(),
            parameters: self.clone(),
            secrets: self.clone(),
            repositories: self.clone(),
            catalog: self.clone(),
        }
    }

    /// Every call so far, as `operation:subject`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls.lock().iter().any(|c| c == call)
    }

    /// Make the call named `call` fail with `error`.
    pub fn fail(&self, call: &str, error: OpsError) {
        self.failing.lock().insert(call.to_string(), error);
    }

    /// Stack event lists returned by successive describe calls.
    pub fn script_stack_events(&self, replies: Vec<Result<Vec<StackEvent>, OpsError>>) {
        self.stack_events.lock().replies = replies.into();
    }

    /// Deployment lists returned by successive list calls.
    pub fn script_deployments(&self, replies: Vec<Result<Vec<DeploymentObject>, OpsError>>) {
        self.deployments.lock().replies = replies.into();
    }

    pub fn set_manifests(&self, manifests: Vec<Manifest>) {
        *self.manifests.lock() = manifests;
    }

    pub fn set_parameter(&self, value: &str) {
        *self.parameter.lock() = value.to_string();
    }

    pub fn add_location(&self, location_ref: &str, id: &str) {
        self.locations
            .lock()
            .insert(location_ref.to_string(), LocationId::new(id));
    }

    pub fn deleted_manifests(&self) -> Vec<Vec<Manifest>> {
        self.deleted_manifests.lock().clone()
    }

    pub fn applied_manifests(&self) -> Vec<Vec<Manifest>> {
        self.applied_manifests.lock().clone()
    }

    fn call(&self, call: String) -> Result<(), OpsError> {
        let failure = self.failing.lock().get(&call).cloned();
        self.calls.lock().push(call);
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// A deployment object with the given replica counts.
pub fn deployment(uid: &str, name: &str, desired: u32, ready: Option<u32>) -> DeploymentObject {
    DeploymentObject {
        uid: DeploymentUid::new(uid),
        name: name.to_string(),
        spec_replicas: Some(desired),
        ready_replicas: ready,
        updated_replicas: ready,
        conditions: Vec::new(),
    }
}

/// A root stack event.
pub fn stack_event(status: &str) -> StackEvent {
    StackEvent::new("AWS::CloudFormation::Stack", status, "orders-dev")
}

/// A resource event inside the stack.
pub fn resource_event(status: &str) -> StackEvent {
    StackEvent::new("AWS::ECS::Service", status, "Service")
}

#[async_trait]
impl StackOps for FakePlatform {
    async fn describe_stack_events(&self, stack: &StackRef) -> Result<Vec<StackEvent>, OpsError> {
        self.call(format!("describe_stack_events:{}", stack.stack_name))?;
        self.stack_events.lock().next()
    }

    async fn create_stack(&self, stack: &StackRef, _: &StackTemplate) -> Result<(), OpsError> {
        self.call(format!("create_stack:{}", stack.stack_name))
    }

    async fn update_stack(&self, stack: &StackRef, _: &StackTemplate) -> Result<(), OpsError> {
        self.call(format!("update_stack:{}", stack.stack_name))
    }

    async fn delete_stack(&self, stack: &StackRef) -> Result<(), OpsError> {
        self.call(format!("delete_stack:{}", stack.stack_name))
    }
}

#[async_trait]
impl PipelineOps for FakePlatform {
    async fn trigger_terraform_destroy(&self, request: &TerraformDestroy) -> Result<(), OpsError> {
        self.call(format!("terraform_destroy:{}", request.env_name))
    }
}

#[async_trait]
impl PlatformStackOps for FakePlatform {
    async fn delete_provider_stack(
        &self,
        _: &BackendParams,
        stack_name: &str,
        _: &str,
    ) -> Result<(), OpsError> {
        self.call(format!("delete_provider_stack:{stack_name}"))
    }
}

#[async_trait]
impl ClusterOps for FakePlatform {
    async fn list_deployment_objects(
        &self,
        query: &DeploymentQuery,
    ) -> Result<Vec<DeploymentObject>, OpsError> {
        self.call(format!("list_deployments:{}", query.env_name))?;
        self.deployments.lock().next()
    }

    async fn delete_manifests(
        &self,
        target: &ClusterTarget,
        manifests: &[Manifest],
        _: &str,
    ) -> Result<(), OpsError> {
        self.call(format!("delete_manifests:{}", target.namespace))?;
        self.deleted_manifests.lock().push(manifests.to_vec());
        Ok(())
    }

    async fn apply_manifests(
        &self,
        target: &ClusterTarget,
        manifests: &[Manifest],
        _: &str,
    ) -> Result<(), OpsError> {
        self.call(format!("apply_manifests:{}", target.namespace))?;
        self.applied_manifests.lock().push(manifests.to_vec());
        Ok(())
    }
}

#[async_trait]
impl ParameterOps for FakePlatform {
    async fn get_parameter(&self, _: &BackendParams, name: &str) -> Result<String, OpsError> {
        self.call(format!("get_parameter:{name}"))?;
        Ok(self.parameter.lock().clone())
    }
}

#[async_trait]
impl SecretOps for FakePlatform {
    async fn delete_secret(&self, secret_name: &str) -> Result<(), OpsError> {
        self.call(format!("delete_secret:{secret_name}"))
    }
}

#[async_trait]
impl RepositoryOps for FakePlatform {
    async fn fetch_manifests(&self, source: &ManifestSource) -> Result<Vec<Manifest>, OpsError> {
        self.call(format!("fetch_manifests:{}", source.env_name))?;
        Ok(self.manifests.lock().clone())
    }

    async fn delete_repository(
        &self,
        _: &BackendParams,
        repository: &RepositoryInfo,
    ) -> Result<(), OpsError> {
        self.call(format!("delete_repository:{}", repository.name))
    }
}

#[async_trait]
impl CatalogOps for FakePlatform {
    async fn location_by_ref(&self, location_ref: &str) -> Result<Option<LocationId>, OpsError> {
        self.call(format!("location_by_ref:{location_ref}"))?;
        Ok(self.locations.lock().get(location_ref).cloned())
    }

    async fn remove_location(&self, id: &LocationId) -> Result<(), OpsError> {
        self.call(format!("remove_location:{id}"))
    }

    async fn remove_entity(&self, uid: &EntityUid) -> Result<(), OpsError> {
        self.call(format!("remove_entity:{uid}"))
    }
}
