use std::sync::Arc;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};

use kube::runtime::reflector::Store;
use ks_core::prelude::*;
#[cfg(feature = "mock")]
use mockall::automock;

// The read side of a watch cache.  Everything downstream of here only ever sees a point-in-time
// list of shared, read-only objects; the watch machinery that keeps the list up to date lives
// behind this trait and is never touched directly.
//
// Listing from an unsynced cache is allowed and just returns whatever has been seen so far;
// callers that care have to check `has_synced` (or wait on the CacheManager) first.
#[cfg_attr(feature = "mock", automock)]
pub trait ObjectCache: Send + Sync {
    fn list(&self) -> anyhow::Result<Vec<Arc<DynamicObject>>>;
    fn has_synced(&self) -> bool;
}

// A cache backed by a kube-runtime reflector store.  The store is written by the CacheWatcher
// task for the same kind; this half only reads.
#[derive(Clone)]
pub struct ReflectorCache {
    kind: ResourceKind,
    store: Store<DynamicObject>,
    synced: Arc<AtomicBool>,
}

impl ReflectorCache {
    pub(crate) fn new(kind: ResourceKind, store: Store<DynamicObject>) -> ReflectorCache {
        ReflectorCache { kind, store, synced: Arc::new(AtomicBool::new(false)) }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    // Returns true the first time the cache is marked as synced, so the caller knows whether it
    // needs to announce readiness.
    pub(crate) fn mark_synced(&self) -> bool {
        !self.synced.swap(true, Ordering::AcqRel)
    }
}

impl ObjectCache for ReflectorCache {
    fn list(&self) -> anyhow::Result<Vec<Arc<DynamicObject>>> {
        Ok(self.store.state())
    }

    fn has_synced(&self) -> bool {
        self.synced.load(Ordering::Acquire)
    }
}
