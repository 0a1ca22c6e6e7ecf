// ABOUTME: Request documents understood by the remote kubectl function.
// ABOUTME: Object reads, manifest deletes, and manifest updates.

use serde::Serialize;

use crate::ops::{ClusterTarget, Manifest};

const OBJECT_VALUE_RESOURCE: &str = "Custom::AWSCDK-EKS-KubernetesObjectValue";
const KUBERNETES_RESOURCE: &str = "Custom::AWSCDK-EKS-KubernetesResource";
const TIMEOUT_SECONDS: &str = "5";
const REQUEST_RESPONSE: &str = "RequestResponse";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KubectlRequest<P> {
    request_type: &'static str,
    resource_type: &'static str,
    resource_properties: P,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectQuery {
    timeout_seconds: &'static str,
    cluster_name: String,
    role_arn: String,
    object_namespace: String,
    invocation_type: &'static str,
    object_type: String,
    object_labels: String,
    json_path: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManifestChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_seconds: Option<&'static str>,
    cluster_name: String,
    role_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    invocation_type: Option<&'static str>,
    /// The manifests as a JSON document inside a string.
    manifest: String,
}

/// Read every object of `object_type` matching `labels`.
pub fn list_objects(
    target: &ClusterTarget,
    object_type: &str,
    labels: String,
) -> KubectlRequest<ObjectQuery> {
    KubectlRequest {
        request_type: "Create",
        resource_type: OBJECT_VALUE_RESOURCE,
        resource_properties: ObjectQuery {
            timeout_seconds: TIMEOUT_SECONDS,
            cluster_name: target.cluster_name.clone(),
            role_arn: target.role_arn.clone(),
            object_namespace: target.namespace.clone(),
            invocation_type: REQUEST_RESPONSE,
            object_type: object_type.to_string(),
            object_labels: labels,
            json_path: "@",
        },
    }
}

pub fn delete_manifests(
    target: &ClusterTarget,
    manifests: &[Manifest],
) -> serde_json::Result<KubectlRequest<ManifestChange>> {
    Ok(KubectlRequest {
        request_type: "Delete",
        resource_type: KUBERNETES_RESOURCE,
        resource_properties: ManifestChange {
            timeout_seconds: None,
            cluster_name: target.cluster_name.clone(),
            role_arn: target.role_arn.clone(),
            invocation_type: None,
            manifest: serde_json::to_string(manifests)?,
        },
    })
}

pub fn update_manifests(
    target: &ClusterTarget,
    manifests: &[Manifest],
) -> serde_json::Result<KubectlRequest<ManifestChange>> {
    Ok(KubectlRequest {
        request_type: "Update",
        resource_type: KUBERNETES_RESOURCE,
        resource_properties: ManifestChange {
            timeout_seconds: Some(TIMEOUT_SECONDS),
            cluster_name: target.cluster_name.clone(),
            role_arn: target.role_arn.clone(),
            invocation_type: Some(REQUEST_RESPONSE),
            manifest: serde_json::to_string(manifests)?,
        },
    })
}
