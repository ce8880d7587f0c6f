mod manager_test;

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use kube::api::{
    ApiResource,
    TypeMeta,
};
use kube::runtime::WatchStreamExt;
use kube::runtime::reflector::store::Writer;
use kube::runtime::watcher::{
    self,
    Event,
};
use ks_core::prelude::*;
use rstest::*;
use serde_json as json;
use tokio::sync::mpsc;

use crate::cache::ReflectorCache;
use crate::watchers::CacheEventStream;
use crate::*;

fn test_rs(name: &str) -> DynamicObject {
    let ar = ApiResource::erase::<appsv1::ReplicaSet>(&());
    DynamicObject {
        metadata: metav1::ObjectMeta {
            name: Some(name.into()),
            namespace: Some("test-namespace".into()),
            ..Default::default()
        },
        types: Some(TypeMeta { api_version: ar.api_version, kind: ar.kind }),
        data: json::json!({"spec": {"replicas": 1}}),
    }
}

// Builds a cache/watcher pair for the given events, wired through a real reflector writer
fn reflected(kind: ResourceKind, events: Vec<Event<DynamicObject>>) -> (ReflectorCache, CacheWatcher) {
    let writer = Writer::new(kind.api_resource());
    let cache = ReflectorCache::new(kind, writer.as_reader());
    let stream: CacheEventStream = stream::iter(events.into_iter().map(Ok::<_, watcher::Error>))
        .reflect(writer)
        .boxed();
    (cache.clone(), CacheWatcher::new_from_parts(cache, stream))
}
