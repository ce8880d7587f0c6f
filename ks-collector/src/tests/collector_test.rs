use std::time::Duration;

use ks_core::errors::*;
use ks_store::mock::MockObjectCache;

use super::*;

#[rstest]
#[tokio::test]
async fn test_collect_once(test_deployment: appsv1::Deployment) {
    let collector =
        test_collector(vec![(ResourceKind::Deployment, FakeCache::shared(vec![to_dyn(&test_deployment)]))]);
    let mut writer = RecordWriter::new(vec![]);

    collect_loop(&collector, &mut writer, Duration::from_secs(60), true, &CancellationToken::new())
        .await
        .unwrap();

    let lines = parse_lines(&writer.into_inner());
    assert_len_eq_x!(&lines, 1);
    assert_eq!(lines[0]["resourceType"], "deployment");
    assert_eq!(lines[0]["desiredReplicas"], 3);
}

#[rstest]
#[tokio::test]
async fn test_collect_loop_stops_when_cancelled(test_deployment: appsv1::Deployment) {
    let collector =
        test_collector(vec![(ResourceKind::Deployment, FakeCache::shared(vec![to_dyn(&test_deployment)]))]);
    let mut writer = RecordWriter::new(vec![]);

    let cancel = CancellationToken::new();
    cancel.cancel();
    collect_loop(&collector, &mut writer, Duration::from_secs(60), false, &cancel).await.unwrap();
    assert_eq!(writer.written(), 0);
}

#[rstest]
#[tokio::test]
async fn test_collect_once_returns_cache_errors() {
    let mut cache = MockObjectCache::new();
    cache.expect_list().returning(|| Err(anyhow!("watch cache went away")));
    let cache: Arc<dyn ObjectCache> = Arc::new(cache);

    let collector = test_collector(vec![(ResourceKind::Pod, cache)]);
    let mut writer = RecordWriter::new(vec![]);

    let res = collect_loop(&collector, &mut writer, Duration::from_secs(60), true, &CancellationToken::new()).await;
    assert_err!(res);
    assert_eq!(writer.written(), 0);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_collect_loop_retries_after_failure(test_pod: corev1::Pod) {
    let obj = to_dyn(&test_pod);
    let mut cache = MockObjectCache::new();
    let mut seq = mockall::Sequence::new();
    cache
        .expect_list()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Err(anyhow!("watch cache went away")));
    cache
        .expect_list()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move || Ok(vec![Arc::new(obj.clone())]));
    let cache: Arc<dyn ObjectCache> = Arc::new(cache);

    let collector = test_collector(vec![(ResourceKind::Pod, cache)]);
    let mut writer = RecordWriter::new(vec![]);
    let cancel = CancellationToken::new();

    // the loop never finishes on its own, so stop it once the second pass has had time to run
    let stopper = cancel.clone();
    let res = tokio::join!(collect_loop(&collector, &mut writer, Duration::from_secs(10), false, &cancel), async move {
        tokio::time::sleep(Duration::from_secs(15)).await;
        stopper.cancel();
    });
    res.0.unwrap();
    assert_eq!(writer.written(), 1);
}

#[rstest]
fn test_default_config_without_file() {
    let args = Options { config_file: None, verbosity: "info".into(), once: true };
    let config = load_config(&args).unwrap();
    assert_eq!(config.resources.len(), ResourceKind::ALL.len());
    assert_eq!(config.interval(), Duration::from_secs(DEFAULT_COLLECTION_INTERVAL_SECONDS));
}

#[rstest]
fn test_counter_summary(test_deployment: appsv1::Deployment) {
    let mut broken = to_dyn(&test_deployment);
    broken.metadata.name = Some("broken".into());
    broken.data["spec"]["replicas"] = json::json!("three");
    let collector = test_collector(vec![(
        ResourceKind::Deployment,
        FakeCache::shared(vec![to_dyn(&test_deployment), broken]),
    )]);

    let recorder = MemoryRecorder::new();
    metrics::with_local_recorder(&recorder, || collector.collect_pass(&CancellationToken::new())).unwrap();

    assert_eq!(
        counter_summary(&recorder, ResourceKind::Deployment),
        "deployment: 1 records emitted, 1 objects skipped, 0 quantity fallbacks"
    );
    assert_eq!(
        counter_summary(&recorder, ResourceKind::Pod),
        "pod: 0 records emitted, 0 objects skipped, 0 quantity fallbacks"
    );
}
