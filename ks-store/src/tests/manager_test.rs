use tokio::task::JoinSet;

use super::*;

#[rstest]
#[tokio::test]
async fn test_wait_ready() {
    let (ready_tx, ready_rx) = mpsc::channel(2);
    let mut js = JoinSet::new();
    let mut caches: Vec<(ResourceKind, Arc<dyn ObjectCache>)> = vec![];

    for kind in [ResourceKind::ReplicaSet, ResourceKind::Deployment] {
        let (cache, watcher) = reflected(kind, vec![Event::Init, Event::InitDone]);
        js.spawn(watcher.start(ready_tx.clone()));
        caches.push((kind, Arc::new(cache)));
    }
    drop(ready_tx);

    let mut manager = CacheManager::new_from_parts(caches, ready_rx, js);
    manager.wait_ready().await;

    assert!(manager.all_synced());
    assert_eq!(manager.caches().len(), 2);
    manager.shutdown().await;
}

#[rstest]
#[tokio::test]
async fn test_wait_ready_watchers_exit_early() {
    let (ready_tx, ready_rx) = mpsc::channel(1);
    let mut js = JoinSet::new();

    let (cache, watcher) = reflected(ResourceKind::Pod, vec![Event::Init]);
    js.spawn(watcher.start(ready_tx));

    let cache: Arc<dyn ObjectCache> = Arc::new(cache);
    let mut manager = CacheManager::new_from_parts(vec![(ResourceKind::Pod, cache)], ready_rx, js);

    // returns instead of hanging forever
    manager.wait_ready().await;
    assert!(!manager.all_synced());
}
