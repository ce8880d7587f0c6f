use super::*;

#[rstest]
fn test_write_snapshot_json_lines(test_limit_range: corev1::LimitRange, test_role_binding: rbacv1::RoleBinding) {
    let collector = test_collector(vec![
        (ResourceKind::LimitRange, FakeCache::shared(vec![to_dyn(&test_limit_range)])),
        (ResourceKind::RoleBinding, FakeCache::shared(vec![to_dyn(&test_role_binding)])),
    ]);
    let snapshot = collector.collect_pass(&CancellationToken::new()).unwrap();

    let mut writer = RecordWriter::new(vec![]);
    writer.write_snapshot(&snapshot).unwrap();
    assert_eq!(writer.written(), 2);

    let out = writer.into_inner();
    assert!(out.ends_with(b"\n"));

    let lines = parse_lines(&out);
    assert_len_eq_x!(&lines, 2);
    assert_eq!(lines[0]["resourceType"], "limitrange");
    assert_eq!(lines[0]["limits"][0]["min"]["cpu"], "100m");
    assert_eq!(lines[1]["resourceType"], "rolebinding");
    assert_eq!(lines[1]["roleRef"]["name"], "pod-reader");
    assert!(lines.iter().all(|l| l["captureTs"] == TEST_CAPTURE_TS));
}

#[rstest]
fn test_write_empty_snapshot() {
    let mut writer = RecordWriter::new(vec![]);
    writer.write_snapshot(&Default::default()).unwrap();
    assert_eq!(writer.written(), 0);
    assert_is_empty!(writer.into_inner());
}
