use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use ks_core::prelude::*;
use ks_core::quantity::{
    ParsedQuantity,
    canonical_or_raw,
};
use metrics::counter;
use serde::Serialize;
use tracing::*;

use super::*;
use crate::conditions::{
    find_condition,
    is_true,
    true_since,
};

const QOS_RESOURCES: [&str; 2] = [CPU_RESOURCE, MEMORY_RESOURCE];

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TolerationRecord {
    pub key: String,
    pub operator: String,
    pub value: String,
    pub effect: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub toleration_seconds: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    pub claim_name: String,
    pub read_only: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodRecord {
    pub node_name: String,
    pub host_ip: String,
    pub pod_ip: String,
    pub phase: String,
    pub qos_class: String,
    pub priority_class: String,

    pub ready: bool,
    pub containers_ready: bool,
    pub initialized: bool,
    pub scheduled: bool,
    pub restart_count: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<metav1::Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<metav1::Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialized_at: Option<metav1::Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_at: Option<metav1::Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<metav1::Time>,

    pub status_reason: String,
    pub unschedulable: bool,
    pub tolerations: Vec<TolerationRecord>,
    pub node_selectors: BTreeMap<String, String>,
    pub claims: Vec<ClaimRecord>,
    pub requests: BTreeMap<String, String>,
    pub limits: BTreeMap<String, String>,
}

impl From<corev1::Pod> for PodRecord {
    fn from(pod: corev1::Pod) -> PodRecord {
        let spec = pod.spec.unwrap_or_default();
        let status = pod.status.unwrap_or_default();
        let conds = status.conditions.as_ref();

        let qos_class = match status.qos_class.as_deref() {
            Some(qos) if !qos.is_empty() => qos.into(),
            _ => derive_qos_class(&spec).into(),
        };

        let unschedulable = find_condition(conds, POD_SCHEDULED_CONDITION)
            .is_some_and(|c| c.status == CONDITION_FALSE && c.reason.as_deref() == Some(POD_UNSCHEDULABLE_REASON));

        let resources = || spec.containers.iter().map(|c| c.resources.as_ref());
        let requests = aggregate_quantities(resources().map(|r| r.and_then(|r| r.requests.as_ref())));
        let limits = aggregate_quantities(resources().map(|r| r.and_then(|r| r.limits.as_ref())));

        PodRecord {
            node_name: spec.node_name.clone().unwrap_or_default(),
            host_ip: status.host_ip.clone().unwrap_or_default(),
            pod_ip: status.pod_ip.clone().unwrap_or_default(),
            phase: status.phase.clone().unwrap_or_default(),
            qos_class,
            priority_class: spec.priority_class_name.clone().unwrap_or_default(),

            ready: is_true(conds, POD_READY_CONDITION),
            containers_ready: is_true(conds, POD_CONTAINERS_READY_CONDITION),
            initialized: is_true(conds, POD_INITIALIZED_CONDITION),
            scheduled: is_true(conds, POD_SCHEDULED_CONDITION),
            restart_count: restart_count(&status),

            deleted_at: pod.metadata.deletion_timestamp,
            started_at: status.start_time.clone(),
            initialized_at: true_since(conds, POD_INITIALIZED_CONDITION),
            ready_at: true_since(conds, POD_READY_CONDITION),
            scheduled_at: true_since(conds, POD_SCHEDULED_CONDITION),

            status_reason: status_reason(&status),
            unschedulable,
            tolerations: spec.tolerations.iter().flatten().map(TolerationRecord::from).collect(),
            node_selectors: spec.node_selector.clone().unwrap_or_default(),
            claims: spec
                .volumes
                .iter()
                .flatten()
                .filter_map(|v| v.persistent_volume_claim.as_ref())
                .map(|pvc| ClaimRecord { claim_name: pvc.claim_name.clone(), read_only: pvc.read_only.unwrap_or(false) })
                .collect(),
            requests,
            limits,
        }
    }
}

impl From<&corev1::Toleration> for TolerationRecord {
    fn from(t: &corev1::Toleration) -> TolerationRecord {
        TolerationRecord {
            key: t.key.clone().unwrap_or_default(),
            operator: t.operator.clone().unwrap_or_default(),
            value: t.value.clone().unwrap_or_default(),
            effect: t.effect.clone().unwrap_or_default(),
            toleration_seconds: t.toleration_seconds,
        }
    }
}

pub(super) fn transform(obj: &DynamicObject, _: &TransformContext) -> Option<Payload> {
    let pod: corev1::Pod = parse_as(obj)?;
    Some(Payload::Pod(pod.into()))
}

pub fn restart_count(status: &corev1::PodStatus) -> i64 {
    status.container_statuses.iter().flatten().map(|cs| cs.restart_count as i64).sum()
}

// The most specific explanation we can find for the pod's state: the pod's own reason, then the
// first failing condition that says why, then the first terminated container that says why.
pub fn status_reason(status: &corev1::PodStatus) -> String {
    if let Some(reason) = status.reason.as_ref().filter(|r| !r.is_empty()) {
        return reason.clone();
    }

    let from_conditions = status
        .conditions
        .iter()
        .flatten()
        .filter(|c| c.status == CONDITION_FALSE)
        .find_map(|c| c.reason.clone().filter(|r| !r.is_empty()));
    if let Some(reason) = from_conditions {
        return reason;
    }

    status
        .container_statuses
        .iter()
        .flatten()
        .filter_map(|cs| cs.state.as_ref()?.terminated.as_ref())
        .find_map(|term| term.reason.clone().filter(|r| !r.is_empty()))
        .unwrap_or_default()
}

// Sum resource quantities across containers, keeping every resource name we see.  If something
// can't be parsed we still want to record it, so the totals degrade to "a + b" strings.
pub fn aggregate_quantities<'a>(
    maps: impl IntoIterator<Item = Option<&'a BTreeMap<String, Quantity>>>,
) -> BTreeMap<String, String> {
    let mut totals: BTreeMap<String, String> = BTreeMap::new();
    for (name, q) in maps.into_iter().flatten().flatten() {
        match totals.get_mut(name) {
            Some(total) => *total = add_or_concat(name, total, &q.0),
            None => {
                totals.insert(name.clone(), canonical_or_raw(q));
            },
        }
    }
    totals
}

fn add_or_concat(name: &str, total: &str, next: &str) -> String {
    match add_quantity_strings(total, next) {
        Ok(sum) => sum,
        Err(err) => {
            warn!("could not add {name} quantities {total} and {next}: {err}");
            counter!(QUANTITY_FALLBACKS_METRIC, KIND_METRIC_LABEL => ResourceKind::Pod.as_str()).increment(1);
            format!("{total} + {next}")
        },
    }
}

fn add_quantity_strings(total: &str, next: &str) -> anyhow::Result<String> {
    let mut sum: ParsedQuantity = total.parse()?;
    sum.add(&next.parse()?)?;
    Ok(sum.to_string())
}

// Same rules the kubelet uses: no cpu/memory requests or limits anywhere is best effort; cpu and
// memory limits on every container with matching requests is guaranteed; anything else is
// burstable.
pub fn derive_qos_class(spec: &corev1::PodSpec) -> &'static str {
    let mut requests: BTreeMap<&'static str, ParsedQuantity> = BTreeMap::new();
    let mut limits: BTreeMap<&'static str, ParsedQuantity> = BTreeMap::new();
    let mut guaranteed = true;

    for c in spec.init_containers.iter().flatten().chain(spec.containers.iter()) {
        let resources = c.resources.as_ref();
        for (name, q) in qos_quantities(resources.and_then(|r| r.requests.as_ref())) {
            accumulate(&mut requests, name, q);
        }

        let container_limits = qos_quantities(resources.and_then(|r| r.limits.as_ref()));
        if container_limits.len() != QOS_RESOURCES.len() {
            guaranteed = false;
        }
        for (name, q) in container_limits {
            accumulate(&mut limits, name, q);
        }
    }

    if requests.is_empty() && limits.is_empty() {
        return QOS_BEST_EFFORT;
    }

    let requests_match = requests
        .iter()
        .all(|(name, req)| limits.get(name).is_some_and(|lim| lim.same_amount(req)));
    if guaranteed && requests_match && requests.len() == limits.len() {
        QOS_GUARANTEED
    } else {
        QOS_BURSTABLE
    }
}

fn qos_quantities(m: Option<&BTreeMap<String, Quantity>>) -> Vec<(&'static str, ParsedQuantity)> {
    QOS_RESOURCES
        .iter()
        .filter_map(|name| {
            let q: ParsedQuantity = m?.get(*name)?.0.parse().ok()?;
            (!q.is_zero()).then_some((*name, q))
        })
        .collect()
}

fn accumulate(totals: &mut BTreeMap<&'static str, ParsedQuantity>, name: &'static str, q: ParsedQuantity) {
    let total = totals.entry(name).or_insert_with(ParsedQuantity::zero);
    if let Err(err) = total.add(&q) {
        warn!("could not total {name} for qos class: {err}");
    }
}
