// ABOUTME: Decodes the kubectl function's reply into deployment objects.
// ABOUTME: The reply nests the object list as a JSON string under Data.Value.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::ops::{DeploymentCondition, DeploymentObject};
use crate::types::DeploymentUid;

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(rename = "Data", default)]
    data: Option<ReplyData>,
}

#[derive(Debug, Deserialize)]
struct ReplyData {
    #[serde(rename = "Value", default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectList {
    #[serde(default)]
    items: Vec<K8sDeployment>,
}

#[derive(Debug, Deserialize)]
struct K8sDeployment {
    metadata: Metadata,
    #[serde(default)]
    spec: Spec,
    #[serde(default)]
    status: Status,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    uid: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Spec {
    replicas: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Status {
    ready_replicas: Option<u32>,
    updated_replicas: Option<u32>,
    #[serde(default)]
    conditions: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Condition {
    #[serde(rename = "type")]
    kind: String,
    status: String,
    last_update_time: Option<DateTime<Utc>>,
}

impl From<K8sDeployment> for DeploymentObject {
    fn from(raw: K8sDeployment) -> Self {
        Self {
            uid: DeploymentUid::new(raw.metadata.uid),
            name: raw.metadata.name,
            spec_replicas: raw.spec.replicas,
            ready_replicas: raw.status.ready_replicas,
            updated_replicas: raw.status.updated_replicas,
            conditions: raw
                .status
                .conditions
                .into_iter()
                .map(|c| DeploymentCondition {
                    kind: c.kind,
                    status: c.status,
                    last_update_time: c.last_update_time,
                })
                .collect(),
        }
    }
}

/// Parse a decoded reply. A reply without `Data.Value` lists nothing.
pub fn parse_deployments(payload: &[u8]) -> serde_json::Result<Vec<DeploymentObject>> {
    let reply: Reply = serde_json::from_slice(payload)?;
    let Some(value) = reply.data.and_then(|data| data.value) else {
        return Ok(Vec::new());
    };
    let list: ObjectList = serde_json::from_str(&value)?;
    Ok(list.items.into_iter().map(DeploymentObject::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(items: serde_json::Value) -> Vec<u8> {
        let value = json!({ "items": items }).to_string();
        json!({ "Data": { "Value": value } }).to_string().into_bytes()
    }

    #[test]
    fn parses_nested_object_list() {
        let payload = reply(json!([{
            "metadata": { "uid": "u-1", "name": "orders" },
            "spec": { "replicas": 2 },
            "status": {
                "readyReplicas": 1,
                "updatedReplicas": 2,
                "conditions": [{
                    "type": "Available",
                    "status": "True",
                    "lastUpdateTime": "2024-03-01T10:00:00Z"
                }]
            }
        }]));

        let objects = parse_deployments(&payload).unwrap();

        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].uid.as_str(), "u-1");
        assert_eq!(objects[0].spec_replicas, Some(2));
        assert_eq!(objects[0].ready_replicas, Some(1));
        assert_eq!(objects[0].conditions[0].kind, "Available");
    }

    #[test]
    fn scaled_down_deployment_has_no_ready_count() {
        let payload = reply(json!([{
            "metadata": { "uid": "u-1", "name": "orders" },
            "spec": { "replicas": 0 },
            "status": {}
        }]));

        let objects = parse_deployments(&payload).unwrap();
        assert_eq!(objects[0].ready_replicas, None);
    }

    #[test]
    fn missing_value_lists_nothing() {
        let objects = parse_deployments(br#"{"Status":"SUCCESS"}"#).unwrap();
        assert!(objects.is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_deployments(b"not json").is_err());
    }
}
