use std::collections::BTreeMap;
use std::sync::Arc;

use clockabilly::{
    Clockable,
    UtcClock,
};
use ks_core::errors::*;
use ks_core::prelude::*;
use ks_store::{
    CollectorConfig,
    NamespaceFilter,
    ObjectCache,
    ReplicaSetPolicy,
};
use metrics::counter;
use tokio_util::sync::CancellationToken;
use tracing::*;

use crate::currency::select_current;
use crate::record::{
    Payload,
    Record,
    RecordMeta,
};
use crate::transform::{
    TransformContext,
    parse_as,
    transformer_for,
};

err_impl! {CollectionError,
    #[error("collection pass cancelled before {0}")]
    Cancelled(ResourceKind),
}

// Everything collected in one pass.  All records share the same capture timestamp, and are
// grouped by kind in the order the sources were configured (within a kind, cache order).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub capture_ts: i64,
    pub records: Vec<Record>,
    pub skipped: BTreeMap<ResourceKind, usize>,
}

impl Snapshot {
    pub fn records_of(&self, kind: ResourceKind) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(move |r| r.kind() == kind)
    }

    pub fn skipped_of(&self, kind: ResourceKind) -> usize {
        self.skipped.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct KindOutput {
    pub records: Vec<Record>,
    pub skipped: usize,
}

pub struct Collector {
    sources: Vec<(ResourceKind, Arc<dyn ObjectCache>)>,
    filter: NamespaceFilter,
    rs_policy: ReplicaSetPolicy,
    clock: Box<dyn Clockable + Send + Sync>,
}

impl Collector {
    pub fn new(config: &CollectorConfig, sources: Vec<(ResourceKind, Arc<dyn ObjectCache>)>) -> Collector {
        Collector::new_from_parts(sources, config.namespace_filter(), config.replica_set_policy, UtcClock::boxed())
    }

    pub fn new_from_parts(
        sources: Vec<(ResourceKind, Arc<dyn ObjectCache>)>,
        filter: NamespaceFilter,
        rs_policy: ReplicaSetPolicy,
        clock: Box<dyn Clockable + Send + Sync>,
    ) -> Collector {
        Collector { sources, filter, rs_policy, clock }
    }

    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.sources.iter().map(|(kind, _)| *kind)
    }

    // Cancellation is only checked between kinds; a cancelled pass is an error, we never hand back
    // a partial snapshot.  Errors from the caches are passed through as-is.
    #[instrument(skip_all)]
    pub fn collect_pass(&self, cancel: &CancellationToken) -> anyhow::Result<Snapshot> {
        let capture_ts = self.clock.now_ts();
        let mut snapshot = Snapshot { capture_ts, ..Default::default() };

        for (kind, cache) in &self.sources {
            if cancel.is_cancelled() {
                bail!(CollectionError::cancelled(kind));
            }

            let output = self.collect_kind(*kind, cache.as_ref(), capture_ts)?;
            if output.skipped > 0 {
                snapshot.skipped.insert(*kind, output.skipped);
            }
            snapshot.records.extend(output.records);
        }

        info!(
            "collected {} records at {capture_ts} ({} objects skipped)",
            snapshot.records.len(),
            snapshot.total_skipped()
        );
        Ok(snapshot)
    }

    pub fn collect_kind(&self, kind: ResourceKind, cache: &dyn ObjectCache, capture_ts: i64) -> anyhow::Result<KindOutput> {
        let mut skipped = 0;
        let mut in_scope = vec![];
        for obj in cache.list()? {
            if !self.filter.admits(kind, &obj) {
                continue;
            }

            // Something other than what we asked for ended up in this cache; this shouldn't
            // happen, but it's not worth failing the whole pass over.
            if !kind.is_kind_of(&obj) {
                skipped += 1;
                continue;
            }
            in_scope.push(obj);
        }

        // Currency is only decided among replicasets that can be read.
        if kind == ResourceKind::ReplicaSet {
            let before = in_scope.len();
            in_scope.retain(|obj| parse_as::<appsv1::ReplicaSet>(obj).is_some());
            skipped += before - in_scope.len();
        }

        let currency = (kind == ResourceKind::ReplicaSet).then(|| select_current(&in_scope));
        let ctx = TransformContext { currency: currency.as_ref() };
        let transform = transformer_for(kind);

        let mut records = Vec::with_capacity(in_scope.len());
        for obj in &in_scope {
            let Some(payload) = transform(obj, &ctx) else {
                skipped += 1;
                continue;
            };

            if let Payload::ReplicaSet(rs) = &payload
                && !self.rs_policy.admits(rs.is_current, rs.desired_replicas)
            {
                continue;
            }

            records.push(Record { meta: RecordMeta::from_obj(kind, obj, capture_ts), payload });
        }

        if skipped > 0 {
            warn!("skipped {skipped} {kind} objects that could not be read as {kind}");
            counter!(SKIPPED_OBJECTS_METRIC, KIND_METRIC_LABEL => kind.as_str()).increment(skipped as u64);
        }
        counter!(RECORDS_EMITTED_METRIC, KIND_METRIC_LABEL => kind.as_str()).increment(records.len() as u64);
        debug!("collected {} {kind} records", records.len());

        Ok(KindOutput { records, skipped })
    }
}
