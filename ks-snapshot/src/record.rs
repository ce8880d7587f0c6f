use std::collections::BTreeMap;

use ks_core::prelude::*;
use serde::Serialize;

use crate::transform::{
    ClusterRoleBindingRecord,
    DaemonSetRecord,
    DeploymentRecord,
    HorizontalPodAutoscalerRecord,
    LimitRangeRecord,
    PodRecord,
    ReplicaSetRecord,
    ReplicationControllerRecord,
    ResourceQuotaRecord,
    RoleBindingRecord,
    StatefulSetRecord,
};

// Condition statuses are strings in the API; anything other than "True" or "False" (including a
// missing condition) is reported as unknown.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tristate {
    True,
    False,
    #[default]
    Unknown,
}

impl Tristate {
    pub fn from_status(status: &str) -> Tristate {
        match status {
            CONDITION_TRUE => Tristate::True,
            CONDITION_FALSE => Tristate::False,
            _ => Tristate::Unknown,
        }
    }
}

// Fields common to every record, regardless of kind
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    pub resource_type: ResourceKind,
    pub name: String,
    pub namespace: String,
    pub created: i64,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub controller_kind: String,
    pub controller_name: String,
    pub capture_ts: i64,
}

impl RecordMeta {
    pub fn from_obj(kind: ResourceKind, obj: &DynamicObject, capture_ts: i64) -> RecordMeta {
        let (controller_kind, controller_name) = obj.controller();
        RecordMeta {
            resource_type: kind,
            name: obj.name_any(),
            namespace: obj.namespace().unwrap_or_default(),
            created: obj.creation_ts(),
            labels: obj.labels().clone(),
            annotations: obj.annotations().clone(),
            controller_kind,
            controller_name,
            capture_ts,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Pod(PodRecord),
    ReplicaSet(ReplicaSetRecord),
    ReplicationController(ReplicationControllerRecord),
    HorizontalPodAutoscaler(HorizontalPodAutoscalerRecord),
    LimitRange(LimitRangeRecord),
    ResourceQuota(ResourceQuotaRecord),
    RoleBinding(RoleBindingRecord),
    ClusterRoleBinding(ClusterRoleBindingRecord),
    Deployment(DeploymentRecord),
    StatefulSet(StatefulSetRecord),
    DaemonSet(DaemonSetRecord),
}

// A record serializes as a single flat object: the envelope fields and the kind-specific fields
// all live at the top level, and `resourceType` says which payload to expect.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    #[serde(flatten)]
    pub meta: RecordMeta,

    #[serde(flatten)]
    pub payload: Payload,
}

impl Record {
    pub fn kind(&self) -> ResourceKind {
        self.meta.resource_type
    }

    pub fn namespaced_name(&self) -> String {
        if self.meta.namespace.is_empty() {
            self.meta.name.clone()
        } else {
            format!("{}/{}", self.meta.namespace, self.meta.name)
        }
    }
}
