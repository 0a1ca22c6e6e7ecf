// ABOUTME: Orders Kubernetes manifests for deletion.
// ABOUTME: Drops cluster-scoped objects and deletes dependents before what they depend on.

use crate::ops::Manifest;

/// Deletion rank of a Kubernetes kind; lower goes first.
pub fn kind_order(kind: Option<&str>) -> u32 {
    match kind {
        Some("Ingress") => 0,
        Some("Service") => 1,
        Some("Deployment") => 2,
        Some("ConfigMap") => 4,
        Some("RoleBinding") => 999,
        _ => 3,
    }
}

/// Keep only namespaced objects, since the app admin role cannot delete the
/// rest, and sort them by [`kind_order`]. Ties keep their original order.
pub fn prepare_for_deletion(manifests: Vec<Manifest>) -> Vec<Manifest> {
    let mut kept: Vec<Manifest> = manifests
        .into_iter()
        .filter(|manifest| manifest.namespace().is_some())
        .collect();
    kept.sort_by_key(|manifest| kind_order(manifest.kind()));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(kind: &str, name: &str, namespace: Option<&str>) -> Manifest {
        let mut metadata = json!({ "name": name });
        if let Some(ns) = namespace {
            metadata["namespace"] = json!(ns);
        }
        Manifest::new(json!({ "kind": kind, "metadata": metadata }))
    }

    fn kinds(manifests: &[Manifest]) -> Vec<&str> {
        manifests.iter().filter_map(Manifest::kind).collect()
    }

    #[test]
    fn objects_without_namespace_are_dropped() {
        let prepared = prepare_for_deletion(vec![
            manifest("Deployment", "orders", None),
            manifest("Service", "orders", Some("ns-a")),
        ]);
        assert_eq!(kinds(&prepared), vec!["Service"]);
    }

    #[test]
    fn dependency_order_is_applied() {
        let prepared = prepare_for_deletion(vec![
            manifest("RoleBinding", "rb", Some("ns")),
            manifest("ConfigMap", "cm", Some("ns")),
            manifest("ServiceAccount", "sa", Some("ns")),
            manifest("Deployment", "d", Some("ns")),
            manifest("Service", "s", Some("ns")),
            manifest("Ingress", "i", Some("ns")),
        ]);
        assert_eq!(
            kinds(&prepared),
            vec![
                "Ingress",
                "Service",
                "Deployment",
                "ServiceAccount",
                "ConfigMap",
                "RoleBinding"
            ]
        );
    }

    #[test]
    fn equal_kinds_keep_their_order() {
        let prepared = prepare_for_deletion(vec![
            manifest("Role", "first", Some("ns")),
            manifest("Secret", "second", Some("ns")),
            manifest("Role", "third", Some("ns")),
        ]);
        let names: Vec<_> = prepared.iter().filter_map(Manifest::name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn missing_kind_sorts_with_general_objects() {
        assert_eq!(kind_order(None), 3);
    }
}
