mod collector_test;
mod output_test;

use std::sync::Arc;

use assertables::*;
use clockabilly::mock::MockUtcClock;
use ks_core::prelude::*;
use ks_snapshot::Collector;
use ks_store::{
    NamespaceFilter,
    ObjectCache,
    ReplicaSetPolicy,
};
use ks_testutils::*;
use rstest::*;
use serde_json as json;

use super::*;

fn test_collector(sources: Vec<(ResourceKind, Arc<dyn ObjectCache>)>) -> Collector {
    Collector::new_from_parts(
        sources,
        NamespaceFilter::default(),
        ReplicaSetPolicy::default(),
        MockUtcClock::boxed(TEST_CAPTURE_TS),
    )
}

fn parse_lines(out: &[u8]) -> Vec<json::Value> {
    String::from_utf8_lossy(out)
        .lines()
        .map(|line| json::from_str(line).unwrap())
        .collect()
}
