use std::sync::Arc;
use std::sync::atomic::Ordering;

use metrics::{
    Counter,
    Gauge,
    Histogram,
    Key,
    KeyName,
    Label,
    Metadata,
    Recorder,
    SharedString,
    Unit,
    set_global_recorder,
};
use metrics_util::registry::{
    AtomicStorage,
    Registry,
};

use crate::prelude::*;

// An in-memory metrics recorder.  The collector installs one globally and reports the totals when it
// exits; tests install their own for a closure with `metrics::with_local_recorder` so tests running
// in parallel don't see each other's counts.
#[derive(Clone)]
pub struct MemoryRecorder {
    registry: Arc<Registry<Key, AtomicStorage>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        MemoryRecorder { registry: Arc::new(Registry::atomic()) }
    }

    pub fn install_global(self) -> anyhow::Result<Self> {
        set_global_recorder(self.clone())?;
        Ok(self)
    }

    pub fn counter_for_kind(&self, name: &'static str, kind: ResourceKind) -> u64 {
        let key = Key::from_parts(name, vec![Label::new(KIND_METRIC_LABEL, kind.as_str())]);
        self.counter(&key)
    }

    pub fn counter(&self, key: &Key) -> u64 {
        self.registry.get_counter(key).map(|v| v.load(Ordering::Relaxed)).unwrap_or(0)
    }
}

impl Default for MemoryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder for MemoryRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        self.registry.get_or_create_counter(key, |c| Counter::from_arc(c.clone()))
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        self.registry.get_or_create_gauge(key, |g| Gauge::from_arc(g.clone()))
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        self.registry.get_or_create_histogram(key, |h| Histogram::from_arc(h.clone()))
    }
}
