use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use ks_core::prelude::*;
use ks_core::quantity::quantity_map;
use serde::Serialize;

use super::*;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitRecord {
    #[serde(rename = "type")]
    pub type_: String,
    pub resource_type: String,
    pub min: BTreeMap<String, String>,
    pub max: BTreeMap<String, String>,
    pub default: BTreeMap<String, String>,
    pub default_request: BTreeMap<String, String>,
    pub max_limit_request_ratio: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LimitRangeRecord {
    pub limits: Vec<LimitRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResourceQuotaRecord {
    pub hard: BTreeMap<String, String>,
    pub used: BTreeMap<String, String>,
    pub scopes: Vec<String>,
}

impl From<&corev1::LimitRangeItem> for LimitRecord {
    fn from(item: &corev1::LimitRangeItem) -> LimitRecord {
        LimitRecord {
            type_: item.type_.clone(),
            // a limit item can cover several resources, but we only report the first one by name
            resource_type: item.min.as_ref().and_then(|m| m.keys().next().cloned()).unwrap_or_default(),
            min: quantity_map(item.min.as_ref()),
            max: quantity_map(item.max.as_ref()),
            default: quantity_map(item.default.as_ref()),
            default_request: quantity_map(item.default_request.as_ref()),
            max_limit_request_ratio: quantity_map(item.max_limit_request_ratio.as_ref()),
        }
    }
}

pub(super) fn transform_limit_range(obj: &DynamicObject, _: &TransformContext) -> Option<Payload> {
    let lr: corev1::LimitRange = parse_as(obj)?;
    let limits = lr.spec.map(|s| s.limits).unwrap_or_default();

    Some(Payload::LimitRange(LimitRangeRecord { limits: limits.iter().map(LimitRecord::from).collect() }))
}

pub(super) fn transform_resource_quota(obj: &DynamicObject, _: &TransformContext) -> Option<Payload> {
    let rq: corev1::ResourceQuota = parse_as(obj)?;
    let spec = rq.spec.unwrap_or_default();
    let status = rq.status.unwrap_or_default();

    let hard = non_empty(spec.hard.as_ref()).or_else(|| non_empty(status.hard.as_ref()));
    Some(Payload::ResourceQuota(ResourceQuotaRecord {
        hard: quantity_map(hard),
        used: quantity_map(status.used.as_ref()),
        scopes: spec.scopes.unwrap_or_default(),
    }))
}

fn non_empty(m: Option<&BTreeMap<String, Quantity>>) -> Option<&BTreeMap<String, Quantity>> {
    m.filter(|m| !m.is_empty())
}
