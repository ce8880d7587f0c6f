use kube::api::TypeMeta;
use serde_json as json;

use super::*;

fn typed_obj(api_version: &str, kind: &str) -> DynamicObject {
    DynamicObject {
        metadata: Default::default(),
        types: Some(TypeMeta { api_version: api_version.into(), kind: kind.into() }),
        data: json::Value::Null,
    }
}

#[rstest]
#[case::pod(ResourceKind::Pod, "v1", "Pod")]
#[case::replicaset(ResourceKind::ReplicaSet, "apps/v1", "ReplicaSet")]
#[case::hpa(ResourceKind::HorizontalPodAutoscaler, "autoscaling/v2", "HorizontalPodAutoscaler")]
#[case::crb(ResourceKind::ClusterRoleBinding, "rbac.authorization.k8s.io/v1", "ClusterRoleBinding")]
fn test_is_kind_of(#[case] kind: ResourceKind, #[case] api_version: &str, #[case] kind_name: &str) {
    assert!(kind.is_kind_of(&typed_obj(api_version, kind_name)));
}

#[rstest]
fn test_is_kind_of_mismatch() {
    assert!(!ResourceKind::ReplicaSet.is_kind_of(&typed_obj("v1", "Pod")));
    assert!(!ResourceKind::Deployment.is_kind_of(&typed_obj("extensions/v1beta1", "Deployment")));
}

#[rstest]
fn test_is_kind_of_untyped() {
    let obj = DynamicObject { metadata: Default::default(), types: None, data: json::Value::Null };
    assert!(ResourceKind::Pod.is_kind_of(&obj));
}

#[rstest]
fn test_serde_names_match_tags() {
    for kind in ResourceKind::ALL {
        assert_eq!(json::to_string(&kind).unwrap(), format!("\"{kind}\""));
        let parsed: ResourceKind = json::from_str(&format!("\"{}\"", kind.as_str())).unwrap();
        assert_eq!(parsed, kind);
    }
}

#[rstest]
fn test_only_cluster_role_bindings_are_cluster_scoped() {
    let cluster_scoped: Vec<_> = ResourceKind::ALL.into_iter().filter(|k| !k.is_namespaced()).collect();
    assert_eq!(cluster_scoped, vec![ResourceKind::ClusterRoleBinding]);
}
