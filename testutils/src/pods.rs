use ks_core::klabel;
use ks_core::prelude::*;
use rstest::*;

use crate::constants::*;
use crate::objs::*;

pub fn test_container(name: &str, requests: &[(&str, &str)], limits: &[(&str, &str)]) -> corev1::Container {
    corev1::Container {
        name: name.into(),
        resources: Some(corev1::ResourceRequirements {
            requests: (!requests.is_empty()).then(|| quantities(requests)),
            limits: (!limits.is_empty()).then(|| quantities(limits)),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn pod_condition(type_: &str, status: &str, reason: Option<&str>, at: i64) -> corev1::PodCondition {
    corev1::PodCondition {
        type_: type_.into(),
        status: status.into(),
        reason: reason.map(|r| r.into()),
        last_transition_time: Some(ts(at)),
        ..Default::default()
    }
}

pub fn running_container_status(name: &str, restarts: i32) -> corev1::ContainerStatus {
    corev1::ContainerStatus {
        name: name.into(),
        ready: true,
        restart_count: restarts,
        state: Some(corev1::ContainerState {
            running: Some(corev1::ContainerStateRunning { started_at: Some(ts(TEST_CREATION_TS + 5)) }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn terminated_container_status(name: &str, restarts: i32, reason: Option<&str>) -> corev1::ContainerStatus {
    corev1::ContainerStatus {
        name: name.into(),
        restart_count: restarts,
        state: Some(corev1::ContainerState {
            terminated: Some(corev1::ContainerStateTerminated {
                exit_code: 137,
                reason: reason.map(|r| r.into()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[fixture]
pub fn test_pod() -> corev1::Pod {
    corev1::Pod {
        metadata: metav1::ObjectMeta {
            labels: klabel!("app" => "web"),
            owner_references: Some(vec![owner_ref("ReplicaSet", "the-replicaset")]),
            ..test_meta(Some(TEST_NAMESPACE), TEST_POD)
        },
        spec: Some(corev1::PodSpec {
            node_name: Some(TEST_NODE.into()),
            priority_class_name: Some("high-priority".into()),
            containers: vec![
                test_container("web", &[("cpu", "100m"), ("memory", "64Mi")], &[("cpu", "200m"), ("memory", "128Mi")]),
                test_container("sidecar", &[("cpu", "100m"), ("memory", "64Mi")], &[]),
            ],
            node_selector: klabel!("kubernetes.io/os" => "linux"),
            tolerations: Some(vec![corev1::Toleration {
                key: Some("node.kubernetes.io/not-ready".into()),
                operator: Some("Exists".into()),
                effect: Some("NoExecute".into()),
                toleration_seconds: Some(300),
                ..Default::default()
            }]),
            volumes: Some(vec![
                corev1::Volume {
                    name: "data".into(),
                    persistent_volume_claim: Some(corev1::PersistentVolumeClaimVolumeSource {
                        claim_name: "data-claim".into(),
                        read_only: Some(true),
                    }),
                    ..Default::default()
                },
                corev1::Volume {
                    name: "scratch".into(),
                    persistent_volume_claim: Some(corev1::PersistentVolumeClaimVolumeSource {
                        claim_name: "scratch-claim".into(),
                        read_only: None,
                    }),
                    ..Default::default()
                },
                corev1::Volume { name: "config".into(), ..Default::default() },
            ]),
            ..Default::default()
        }),
        status: Some(corev1::PodStatus {
            phase: Some("Running".into()),
            host_ip: Some("10.0.0.1".into()),
            pod_ip: Some("192.168.0.10".into()),
            qos_class: Some("Burstable".into()),
            start_time: Some(ts(TEST_CREATION_TS + 1)),
            conditions: Some(vec![
                pod_condition("Initialized", "True", None, TEST_CREATION_TS + 2),
                pod_condition("Ready", "True", None, TEST_CREATION_TS + 10),
                pod_condition("ContainersReady", "True", None, TEST_CREATION_TS + 10),
                pod_condition("PodScheduled", "True", None, TEST_CREATION_TS + 1),
            ]),
            container_statuses: Some(vec![running_container_status("web", 1), running_container_status("sidecar", 2)]),
            ..Default::default()
        }),
    }
}
