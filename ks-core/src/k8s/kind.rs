use std::fmt;

use kube::api::ApiResource;
use serde::{
    Deserialize,
    Serialize,
};

use crate::prelude::*;

// Every kind of object we know how to turn into a record.  The serialized name doubles as the
// `resourceType` tag on each record and as the name used in the config file.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Pod,
    ReplicaSet,
    ReplicationController,
    HorizontalPodAutoscaler,
    LimitRange,
    ResourceQuota,
    RoleBinding,
    ClusterRoleBinding,
    Deployment,
    StatefulSet,
    DaemonSet,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::Pod,
        ResourceKind::ReplicaSet,
        ResourceKind::ReplicationController,
        ResourceKind::HorizontalPodAutoscaler,
        ResourceKind::LimitRange,
        ResourceKind::ResourceQuota,
        ResourceKind::RoleBinding,
        ResourceKind::ClusterRoleBinding,
        ResourceKind::Deployment,
        ResourceKind::StatefulSet,
        ResourceKind::DaemonSet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Pod => "pod",
            ResourceKind::ReplicaSet => "replicaset",
            ResourceKind::ReplicationController => "replicationcontroller",
            ResourceKind::HorizontalPodAutoscaler => "horizontalpodautoscaler",
            ResourceKind::LimitRange => "limitrange",
            ResourceKind::ResourceQuota => "resourcequota",
            ResourceKind::RoleBinding => "rolebinding",
            ResourceKind::ClusterRoleBinding => "clusterrolebinding",
            ResourceKind::Deployment => "deployment",
            ResourceKind::StatefulSet => "statefulset",
            ResourceKind::DaemonSet => "daemonset",
        }
    }

    pub fn api_resource(&self) -> ApiResource {
        match self {
            ResourceKind::Pod => ApiResource::erase::<corev1::Pod>(&()),
            ResourceKind::ReplicaSet => ApiResource::erase::<appsv1::ReplicaSet>(&()),
            ResourceKind::ReplicationController => ApiResource::erase::<corev1::ReplicationController>(&()),
            ResourceKind::HorizontalPodAutoscaler => ApiResource::erase::<autoscalingv2::HorizontalPodAutoscaler>(&()),
            ResourceKind::LimitRange => ApiResource::erase::<corev1::LimitRange>(&()),
            ResourceKind::ResourceQuota => ApiResource::erase::<corev1::ResourceQuota>(&()),
            ResourceKind::RoleBinding => ApiResource::erase::<rbacv1::RoleBinding>(&()),
            ResourceKind::ClusterRoleBinding => ApiResource::erase::<rbacv1::ClusterRoleBinding>(&()),
            ResourceKind::Deployment => ApiResource::erase::<appsv1::Deployment>(&()),
            ResourceKind::StatefulSet => ApiResource::erase::<appsv1::StatefulSet>(&()),
            ResourceKind::DaemonSet => ApiResource::erase::<appsv1::DaemonSet>(&()),
        }
    }

    pub fn is_namespaced(&self) -> bool {
        !matches!(self, ResourceKind::ClusterRoleBinding)
    }

    // Objects coming out of the cache should always carry type information (the watchers stamp
    // it on), but if they don't we can't rule them out here and leave it to deserialization.
    pub fn is_kind_of(&self, obj: &DynamicObject) -> bool {
        match &obj.types {
            Some(tm) => {
                let ar = self.api_resource();
                tm.kind == ar.kind && tm.api_version == ar.api_version
            },
            None => true,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
