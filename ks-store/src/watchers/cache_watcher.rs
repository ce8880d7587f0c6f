use futures::StreamExt;
use futures::stream::BoxStream;
use kube::api::{
    Api,
    TypeMeta,
};
use kube::runtime::WatchStreamExt;
use kube::runtime::reflector::store::Writer;
use kube::runtime::watcher::{
    self,
    Event,
    watcher,
};
use ks_core::prelude::*;
use tokio::sync::mpsc;
use tracing::*;

use crate::cache::ReflectorCache;

pub type CacheEventStream = BoxStream<'static, Result<Event<DynamicObject>, watcher::Error>>;

// Drives the watch stream for a single kind.  The reflector writes every event into the store
// backing the paired ReflectorCache; all we do here is notice when the initial list has been
// fully loaded and report problems on the stream.
pub struct CacheWatcher {
    cache: ReflectorCache,
    stream: CacheEventStream,
}

impl CacheWatcher {
    pub fn new_with_stream(kind: ResourceKind, client: kube::Client) -> (ReflectorCache, CacheWatcher) {
        let ar = kind.api_resource();
        let api: Api<DynamicObject> = Api::all_with(client, &ar);
        let writer = Writer::new(ar.clone());
        let cache = ReflectorCache::new(kind, writer.as_reader());

        // List responses don't reliably include apiVersion/kind on each item, so stamp them on
        // from the api we're watching; the collector uses them to reject objects of the wrong kind.
        let types = TypeMeta { api_version: ar.api_version.clone(), kind: ar.kind.clone() };
        let stream = watcher(api, watcher::Config::default())
            .default_backoff()
            .modify(move |obj: &mut DynamicObject| obj.types = Some(types.clone()))
            .reflect(writer)
            .boxed();

        (cache.clone(), CacheWatcher { cache, stream })
    }

    pub fn new_from_parts(cache: ReflectorCache, stream: CacheEventStream) -> CacheWatcher {
        CacheWatcher { cache, stream }
    }

    pub async fn start(mut self, ready_tx: mpsc::Sender<ResourceKind>) {
        let kind = self.cache.kind();
        while let Some(res) = self.stream.next().await {
            match res {
                Ok(Event::InitDone) => {
                    if self.cache.mark_synced() {
                        info!("{kind} cache synced");
                        if ready_tx.send(kind).await.is_err() {
                            debug!("nobody waiting on {kind} readiness");
                        }
                    }
                },
                Ok(_) => (),
                Err(err) => warn!("watch stream for {kind} received error: {err}"),
            }
        }
        warn!("watch stream for {kind} ended");
    }
}
