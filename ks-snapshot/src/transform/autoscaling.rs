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
pub struct HorizontalPodAutoscalerRecord {
    pub min_replicas: i32,
    pub max_replicas: i32,
    pub current_replicas: i32,
    pub desired_replicas: i32,
    pub target_kind: String,
    pub target_name: String,
    pub observed_generation: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_scale_time: Option<metav1::Time>,

    pub conditions: BTreeMap<String, Tristate>,
    pub able_to_scale: Tristate,
    pub scaling_active: Tristate,
    pub scaling_limited: Tristate,
}

pub(super) fn transform(obj: &DynamicObject, _: &TransformContext) -> Option<Payload> {
    let hpa: autoscalingv2::HorizontalPodAutoscaler = parse_as(obj)?;
    let spec = hpa.spec.unwrap_or_default();
    let status = hpa.status.unwrap_or_default();
    let conds = status.conditions.as_ref();

    Some(Payload::HorizontalPodAutoscaler(HorizontalPodAutoscalerRecord {
        min_replicas: spec.min_replicas.unwrap_or(DEFAULT_HPA_MIN_REPLICAS),
        max_replicas: spec.max_replicas,
        current_replicas: count(status.current_replicas),
        desired_replicas: status.desired_replicas,
        target_kind: spec.scale_target_ref.kind,
        target_name: spec.scale_target_ref.name,
        observed_generation: status.observed_generation.unwrap_or(0),
        last_scale_time: status.last_scale_time,
        conditions: condition_map(conds),
        able_to_scale: condition_status(conds, ABLE_TO_SCALE_CONDITION),
        scaling_active: condition_status(conds, SCALING_ACTIVE_CONDITION),
        scaling_limited: condition_status(conds, SCALING_LIMITED_CONDITION),
    }))
}
