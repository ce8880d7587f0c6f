use std::sync::Arc;

use ks_core::prelude::*;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::*;

use crate::cache::ObjectCache;
use crate::config::CollectorConfig;
use crate::watchers::CacheWatcher;

// Owns one watch cache per configured kind, plus the tasks that keep them in sync.
pub struct CacheManager {
    caches: Vec<(ResourceKind, Arc<dyn ObjectCache>)>,
    ready_rx: mpsc::Receiver<ResourceKind>,
    js: JoinSet<()>,
}

impl CacheManager {
    // Must be called from inside a tokio runtime, since it spawns the watcher tasks
    pub fn start(client: kube::Client, config: &CollectorConfig) -> CacheManager {
        let (ready_tx, ready_rx) = mpsc::channel(config.resources.len() + 1);

        let mut js = JoinSet::new();
        let mut caches: Vec<(ResourceKind, Arc<dyn ObjectCache>)> = vec![];
        for kind in &config.resources {
            let (cache, watcher) = CacheWatcher::new_with_stream(*kind, client.clone());
            js.spawn(watcher.start(ready_tx.clone()));
            caches.push((*kind, Arc::new(cache)));
        }

        CacheManager { caches, ready_rx, js }
    }

    pub fn new_from_parts(
        caches: Vec<(ResourceKind, Arc<dyn ObjectCache>)>,
        ready_rx: mpsc::Receiver<ResourceKind>,
        js: JoinSet<()>,
    ) -> CacheManager {
        CacheManager { caches, ready_rx, js }
    }

    pub fn caches(&self) -> Vec<(ResourceKind, Arc<dyn ObjectCache>)> {
        self.caches.clone()
    }

    pub fn all_synced(&self) -> bool {
        self.caches.iter().all(|(_, cache)| cache.has_synced())
    }

    // Blocks until every cache has seen its initial list.  The collector shouldn't run a pass
    // before this returns, or the first snapshot will be missing objects.
    pub async fn wait_ready(&mut self) {
        while !self.all_synced() {
            match self.ready_rx.recv().await {
                Some(kind) => debug!("{kind} reported ready"),
                None => {
                    warn!("all watchers exited before caches were synced");
                    break;
                },
            }
        }
        info!("all {} caches synced", self.caches.len());
    }

    pub async fn shutdown(&mut self) {
        self.js.shutdown().await;
    }
}
