use std::sync::Arc;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};

use ks_core::prelude::*;
use ks_store::ObjectCache;

// A cache that hands back a fixed list of objects, in the order given
pub struct FakeCache {
    objs: Vec<Arc<DynamicObject>>,
    synced: AtomicBool,
}

impl FakeCache {
    pub fn new(objs: Vec<DynamicObject>) -> FakeCache {
        FakeCache {
            objs: objs.into_iter().map(Arc::new).collect(),
            synced: AtomicBool::new(true),
        }
    }

    pub fn unsynced(objs: Vec<DynamicObject>) -> FakeCache {
        let cache = FakeCache::new(objs);
        cache.synced.store(false, Ordering::Relaxed);
        cache
    }

    pub fn shared(objs: Vec<DynamicObject>) -> Arc<dyn ObjectCache> {
        Arc::new(FakeCache::new(objs))
    }

    pub fn objs(&self) -> &[Arc<DynamicObject>] {
        &self.objs
    }
}

impl ObjectCache for FakeCache {
    fn list(&self) -> anyhow::Result<Vec<Arc<DynamicObject>>> {
        Ok(self.objs.clone())
    }

    fn has_synced(&self) -> bool {
        self.synced.load(Ordering::Relaxed)
    }
}
