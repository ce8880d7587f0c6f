use std::collections::BTreeMap;

use ks_core::prelude::*;
use serde::Serialize;

use super::*;
use crate::conditions::{
    condition_map,
    condition_status,
};
use crate::record::Tristate;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaSetRecord {
    pub desired_replicas: i32,
    pub current_replicas: i32,
    pub ready_replicas: i32,
    pub available_replicas: i32,
    pub fully_labeled_replicas: i32,
    pub observed_generation: i64,
    pub conditions: BTreeMap<String, Tristate>,
    pub available: Tristate,
    pub progressing: Tristate,
    pub replica_failure: Tristate,
    pub is_current: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationControllerRecord {
    pub desired_replicas: i32,
    pub current_replicas: i32,
    pub ready_replicas: i32,
    pub available_replicas: i32,
    pub fully_labeled_replicas: i32,
    pub observed_generation: i64,
    pub conditions: BTreeMap<String, Tristate>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub desired_replicas: i32,
    pub updated_replicas: i32,
    pub ready_replicas: i32,
    pub available_replicas: i32,
    pub unavailable_replicas: i32,
    pub observed_generation: i64,
    pub strategy: String,
    pub paused: bool,
    pub conditions: BTreeMap<String, Tristate>,
    pub available: Tristate,
    pub progressing: Tristate,
    pub replica_failure: Tristate,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatefulSetRecord {
    pub desired_replicas: i32,
    pub current_replicas: i32,
    pub ready_replicas: i32,
    pub updated_replicas: i32,
    pub available_replicas: i32,
    pub current_revision: String,
    pub update_revision: String,
    pub observed_generation: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonSetRecord {
    pub desired_scheduled: i32,
    pub current_scheduled: i32,
    pub misscheduled: i32,
    pub ready: i32,
    pub updated: i32,
    pub available: i32,
    pub unavailable: i32,
    pub observed_generation: i64,
}

pub(super) fn transform_replicaset(obj: &DynamicObject, ctx: &TransformContext) -> Option<Payload> {
    let rs: appsv1::ReplicaSet = parse_as(obj)?;
    let status = rs.status.unwrap_or_default();
    let conds = status.conditions.as_ref();

    Some(Payload::ReplicaSet(ReplicaSetRecord {
        desired_replicas: replicas_or_default(rs.spec.and_then(|s| s.replicas)),
        current_replicas: status.replicas,
        ready_replicas: count(status.ready_replicas),
        available_replicas: count(status.available_replicas),
        fully_labeled_replicas: count(status.fully_labeled_replicas),
        observed_generation: status.observed_generation.unwrap_or(0),
        conditions: condition_map(conds),
        available: condition_status(conds, AVAILABLE_CONDITION),
        progressing: condition_status(conds, PROGRESSING_CONDITION),
        replica_failure: condition_status(conds, REPLICA_FAILURE_CONDITION),
        is_current: ctx.currency.is_some_and(|table| table.is_current(&obj.object_key())),
    }))
}

pub(super) fn transform_replication_controller(obj: &DynamicObject, _: &TransformContext) -> Option<Payload> {
    let rc: corev1::ReplicationController = parse_as(obj)?;
    let status = rc.status.unwrap_or_default();

    Some(Payload::ReplicationController(ReplicationControllerRecord {
        desired_replicas: replicas_or_default(rc.spec.and_then(|s| s.replicas)),
        current_replicas: status.replicas,
        ready_replicas: count(status.ready_replicas),
        available_replicas: count(status.available_replicas),
        fully_labeled_replicas: count(status.fully_labeled_replicas),
        observed_generation: status.observed_generation.unwrap_or(0),
        conditions: condition_map(status.conditions.as_ref()),
    }))
}

pub(super) fn transform_deployment(obj: &DynamicObject, _: &TransformContext) -> Option<Payload> {
    let depl: appsv1::Deployment = parse_as(obj)?;
    let spec = depl.spec.unwrap_or_default();
    let status = depl.status.unwrap_or_default();
    let conds = status.conditions.as_ref();

    Some(Payload::Deployment(DeploymentRecord {
        desired_replicas: replicas_or_default(spec.replicas),
        updated_replicas: count(status.updated_replicas),
        ready_replicas: count(status.ready_replicas),
        available_replicas: count(status.available_replicas),
        unavailable_replicas: count(status.unavailable_replicas),
        observed_generation: status.observed_generation.unwrap_or(0),
        strategy: spec.strategy.and_then(|s| s.type_).unwrap_or_default(),
        paused: spec.paused.unwrap_or(false),
        conditions: condition_map(conds),
        available: condition_status(conds, AVAILABLE_CONDITION),
        progressing: condition_status(conds, PROGRESSING_CONDITION),
        replica_failure: condition_status(conds, REPLICA_FAILURE_CONDITION),
    }))
}

pub(super) fn transform_statefulset(obj: &DynamicObject, _: &TransformContext) -> Option<Payload> {
    let sts: appsv1::StatefulSet = parse_as(obj)?;
    let status = sts.status.unwrap_or_default();

    Some(Payload::StatefulSet(StatefulSetRecord {
        desired_replicas: replicas_or_default(sts.spec.and_then(|s| s.replicas)),
        current_replicas: count(status.current_replicas),
        ready_replicas: count(status.ready_replicas),
        updated_replicas: count(status.updated_replicas),
        available_replicas: count(status.available_replicas),
        current_revision: status.current_revision.unwrap_or_default(),
        update_revision: status.update_revision.unwrap_or_default(),
        observed_generation: status.observed_generation.unwrap_or(0),
    }))
}

pub(super) fn transform_daemonset(obj: &DynamicObject, _: &TransformContext) -> Option<Payload> {
    let ds: appsv1::DaemonSet = parse_as(obj)?;
    let status = ds.status.unwrap_or_default();

    Some(Payload::DaemonSet(DaemonSetRecord {
        desired_scheduled: status.desired_number_scheduled,
        current_scheduled: status.current_number_scheduled,
        misscheduled: status.number_misscheduled,
        ready: status.number_ready,
        updated: count(status.updated_number_scheduled),
        available: count(status.number_available),
        unavailable: count(status.number_unavailable),
        observed_generation: status.observed_generation.unwrap_or(0),
    }))
}
