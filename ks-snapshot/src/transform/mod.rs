mod autoscaling;
mod pod;
mod policy;
mod rbac;
mod workloads;

use kube::Resource;
use ks_core::prelude::*;
use serde::de::DeserializeOwned;
use tracing::*;

pub use self::autoscaling::*;
pub use self::pod::*;
pub use self::policy::*;
pub use self::rbac::*;
pub use self::workloads::*;
use crate::currency::CurrencyTable;
use crate::record::{
    Payload,
    Record,
    RecordMeta,
};

// Anything a transformer needs beyond the object itself.  Currency is only computed for
// replicasets; it is `None` for every other kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransformContext<'a> {
    pub currency: Option<&'a CurrencyTable>,
}

// Transformers are total: an object that isn't what the transformer expects produces `None`, and
// the caller decides what to do about it.
pub type TransformFn = fn(&DynamicObject, &TransformContext) -> Option<Payload>;

pub fn transformer_for(kind: ResourceKind) -> TransformFn {
    match kind {
        ResourceKind::Pod => pod::transform,
        ResourceKind::ReplicaSet => workloads::transform_replicaset,
        ResourceKind::ReplicationController => workloads::transform_replication_controller,
        ResourceKind::HorizontalPodAutoscaler => autoscaling::transform,
        ResourceKind::LimitRange => policy::transform_limit_range,
        ResourceKind::ResourceQuota => policy::transform_resource_quota,
        ResourceKind::RoleBinding => rbac::transform_role_binding,
        ResourceKind::ClusterRoleBinding => rbac::transform_cluster_role_binding,
        ResourceKind::Deployment => workloads::transform_deployment,
        ResourceKind::StatefulSet => workloads::transform_statefulset,
        ResourceKind::DaemonSet => workloads::transform_daemonset,
    }
}

pub fn transform(kind: ResourceKind, obj: &DynamicObject, capture_ts: i64, ctx: &TransformContext) -> Option<Record> {
    let payload = transformer_for(kind)(obj, ctx)?;
    Some(Record { meta: RecordMeta::from_obj(kind, obj, capture_ts), payload })
}

pub(crate) fn parse_as<K: Resource<DynamicType = ()> + DeserializeOwned>(obj: &DynamicObject) -> Option<K> {
    if let Some(tm) = &obj.types
        && (tm.kind != K::kind(&()) || tm.api_version != K::api_version(&()))
    {
        debug!("{} is a {}, expected {}", obj.namespaced_name(), tm.kind, K::kind(&()));
        return None;
    }

    match obj.clone().try_parse::<K>() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            debug!("could not parse {} as {}: {err}", obj.namespaced_name(), K::kind(&()));
            None
        },
    }
}

fn count(n: Option<i32>) -> i32 {
    n.unwrap_or(0)
}

fn replicas_or_default(n: Option<i32>) -> i32 {
    n.unwrap_or(DEFAULT_REPLICAS)
}
