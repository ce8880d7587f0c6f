use std::collections::BTreeMap;

use clockabilly::{
    DateTime,
    Utc,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use ks_core::prelude::*;
use rstest::*;
use serde::Serialize;

use crate::constants::*;

// Round-trip a typed object through JSON to get what the watch cache would hand us
pub fn to_dyn<K: Serialize>(obj: &K) -> DynamicObject {
    serde_json::from_value(serde_json::to_value(obj).unwrap()).unwrap()
}

pub fn ts(secs: i64) -> metav1::Time {
    metav1::Time(DateTime::<Utc>::from_timestamp(secs, 0).unwrap())
}

pub fn quantities(items: &[(&str, &str)]) -> BTreeMap<String, Quantity> {
    items.iter().map(|(k, v)| (k.to_string(), Quantity(v.to_string()))).collect()
}

pub fn owner_ref(kind: &str, name: &str) -> metav1::OwnerReference {
    metav1::OwnerReference {
        api_version: "apps/v1".into(),
        kind: kind.into(),
        name: name.into(),
        uid: format!("{name}-uid"),
        controller: Some(true),
        ..Default::default()
    }
}

pub fn test_meta(namespace: Option<&str>, name: &str) -> metav1::ObjectMeta {
    metav1::ObjectMeta {
        namespace: namespace.map(|ns| ns.into()),
        name: Some(name.into()),
        uid: Some(format!("{name}-uid")),
        creation_timestamp: Some(ts(TEST_CREATION_TS)),
        ..Default::default()
    }
}

pub fn test_replicaset(
    namespace: &str,
    name: &str,
    owners: Vec<metav1::OwnerReference>,
    created: i64,
    generation: i64,
) -> appsv1::ReplicaSet {
    appsv1::ReplicaSet {
        metadata: metav1::ObjectMeta {
            creation_timestamp: Some(ts(created)),
            generation: Some(generation),
            owner_references: Some(owners),
            ..test_meta(Some(namespace), name)
        },
        spec: Some(appsv1::ReplicaSetSpec {
            replicas: Some(3),
            selector: Default::default(),
            ..Default::default()
        }),
        status: Some(appsv1::ReplicaSetStatus {
            replicas: 3,
            ready_replicas: Some(2),
            available_replicas: Some(2),
            fully_labeled_replicas: Some(3),
            observed_generation: Some(generation),
            ..Default::default()
        }),
    }
}

// Shorthand for a replicaset owned by the test deployment
pub fn depl_replicaset(name: &str, created: i64, generation: i64) -> DynamicObject {
    to_dyn(&test_replicaset(TEST_NAMESPACE, name, vec![owner_ref("Deployment", TEST_DEPLOYMENT)], created, generation))
}

#[fixture]
pub fn test_limit_range() -> corev1::LimitRange {
    corev1::LimitRange {
        metadata: test_meta(Some(TEST_NAMESPACE), TEST_LIMIT_RANGE),
        spec: Some(corev1::LimitRangeSpec {
            limits: vec![corev1::LimitRangeItem {
                type_: "Container".into(),
                min: Some(quantities(&[("cpu", "100m"), ("memory", "128Mi")])),
                max: Some(quantities(&[("cpu", "2"), ("memory", "2Gi")])),
                ..Default::default()
            }],
        }),
    }
}

#[fixture]
pub fn test_resource_quota() -> corev1::ResourceQuota {
    corev1::ResourceQuota {
        metadata: test_meta(Some(TEST_NAMESPACE), TEST_QUOTA),
        spec: Some(corev1::ResourceQuotaSpec {
            hard: Some(quantities(&[("pods", "10"), ("requests.cpu", "4"), ("requests.memory", "8Gi")])),
            scopes: Some(vec!["NotTerminating".into()]),
            ..Default::default()
        }),
        status: Some(corev1::ResourceQuotaStatus {
            hard: Some(quantities(&[("pods", "10"), ("requests.cpu", "4"), ("requests.memory", "8Gi")])),
            used: Some(quantities(&[("pods", "3"), ("requests.cpu", "1500m"), ("requests.memory", "1024Mi")])),
            ..Default::default()
        }),
    }
}

#[fixture]
pub fn test_role_binding() -> rbacv1::RoleBinding {
    rbacv1::RoleBinding {
        metadata: test_meta(Some(TEST_NAMESPACE), TEST_ROLE_BINDING),
        role_ref: rbacv1::RoleRef {
            api_group: "rbac.authorization.k8s.io".into(),
            kind: "Role".into(),
            name: "pod-reader".into(),
        },
        subjects: Some(vec![
            rbacv1::Subject {
                kind: "ServiceAccount".into(),
                name: "default".into(),
                namespace: Some(TEST_NAMESPACE.into()),
                ..Default::default()
            },
            rbacv1::Subject {
                api_group: Some("rbac.authorization.k8s.io".into()),
                kind: "User".into(),
                name: "jane".into(),
                ..Default::default()
            },
        ]),
    }
}

#[fixture]
pub fn test_cluster_role_binding() -> rbacv1::ClusterRoleBinding {
    rbacv1::ClusterRoleBinding {
        metadata: test_meta(None, "the-cluster-role-binding"),
        role_ref: rbacv1::RoleRef {
            api_group: "rbac.authorization.k8s.io".into(),
            kind: "ClusterRole".into(),
            name: "cluster-admin".into(),
        },
        subjects: Some(vec![rbacv1::Subject {
            api_group: Some("rbac.authorization.k8s.io".into()),
            kind: "Group".into(),
            name: "system:masters".into(),
            ..Default::default()
        }]),
    }
}

#[fixture]
pub fn test_hpa() -> autoscalingv2::HorizontalPodAutoscaler {
    autoscalingv2::HorizontalPodAutoscaler {
        metadata: test_meta(Some(TEST_NAMESPACE), TEST_HPA),
        spec: Some(autoscalingv2::HorizontalPodAutoscalerSpec {
            max_replicas: 10,
            min_replicas: None,
            scale_target_ref: autoscalingv2::CrossVersionObjectReference {
                api_version: Some("apps/v1".into()),
                kind: "Deployment".into(),
                name: TEST_DEPLOYMENT.into(),
            },
            ..Default::default()
        }),
        status: Some(autoscalingv2::HorizontalPodAutoscalerStatus {
            current_replicas: Some(3),
            desired_replicas: 4,
            last_scale_time: Some(ts(TEST_CREATION_TS + 60)),
            observed_generation: Some(2),
            conditions: Some(vec![
                autoscalingv2::HorizontalPodAutoscalerCondition {
                    type_: "AbleToScale".into(),
                    status: "True".into(),
                    ..Default::default()
                },
                autoscalingv2::HorizontalPodAutoscalerCondition {
                    type_: "ScalingLimited".into(),
                    status: "False".into(),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        }),
    }
}

#[fixture]
pub fn test_replication_controller() -> corev1::ReplicationController {
    corev1::ReplicationController {
        metadata: test_meta(Some(TEST_NAMESPACE), "the-rc"),
        spec: Some(corev1::ReplicationControllerSpec { replicas: None, ..Default::default() }),
        status: Some(corev1::ReplicationControllerStatus {
            replicas: 1,
            ready_replicas: Some(1),
            available_replicas: Some(1),
            fully_labeled_replicas: Some(1),
            observed_generation: Some(1),
            conditions: Some(vec![corev1::ReplicationControllerCondition {
                type_: "ReplicaFailure".into(),
                status: "False".into(),
                ..Default::default()
            }]),
            ..Default::default()
        }),
    }
}

#[fixture]
pub fn test_deployment() -> appsv1::Deployment {
    appsv1::Deployment {
        metadata: test_meta(Some(TEST_NAMESPACE), TEST_DEPLOYMENT),
        spec: Some(appsv1::DeploymentSpec {
            replicas: Some(3),
            strategy: Some(appsv1::DeploymentStrategy {
                type_: Some("RollingUpdate".into()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        status: Some(appsv1::DeploymentStatus {
            replicas: Some(3),
            updated_replicas: Some(3),
            ready_replicas: Some(2),
            available_replicas: Some(2),
            unavailable_replicas: Some(1),
            observed_generation: Some(4),
            conditions: Some(vec![
                appsv1::DeploymentCondition {
                    type_: "Available".into(),
                    status: "False".into(),
                    reason: Some("MinimumReplicasUnavailable".into()),
                    ..Default::default()
                },
                appsv1::DeploymentCondition {
                    type_: "Progressing".into(),
                    status: "True".into(),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        }),
    }
}

#[fixture]
pub fn test_statefulset() -> appsv1::StatefulSet {
    appsv1::StatefulSet {
        metadata: test_meta(Some(TEST_NAMESPACE), "the-statefulset"),
        spec: Some(appsv1::StatefulSetSpec { replicas: None, ..Default::default() }),
        status: Some(appsv1::StatefulSetStatus {
            replicas: 1,
            current_replicas: Some(1),
            ready_replicas: Some(1),
            updated_replicas: Some(1),
            available_replicas: Some(1),
            current_revision: Some("the-statefulset-abc".into()),
            update_revision: Some("the-statefulset-def".into()),
            observed_generation: Some(3),
            ..Default::default()
        }),
    }
}

#[fixture]
pub fn test_daemonset() -> appsv1::DaemonSet {
    appsv1::DaemonSet {
        metadata: test_meta(Some(TEST_NAMESPACE), "the-daemonset"),
        spec: Some(Default::default()),
        status: Some(appsv1::DaemonSetStatus {
            desired_number_scheduled: 5,
            current_number_scheduled: 5,
            number_misscheduled: 0,
            number_ready: 4,
            updated_number_scheduled: Some(5),
            number_available: Some(4),
            number_unavailable: Some(1),
            observed_generation: Some(2),
            ..Default::default()
        }),
    }
}
