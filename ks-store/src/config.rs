use std::fs::File;
use std::time::Duration;

use ks_core::errors::*;
use ks_core::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::*;

use crate::filter::NamespaceFilter;

// Controls which replicasets make it into the output.  Either way, every emitted replicaset still
// reports whether it is the current revision for its owner.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplicaSetPolicy {
    // Only the newest revision per (namespace, owner); old revisions kept around for rollback
    // are dropped.
    #[default]
    CurrentRevision,

    // Anything that still wants pods, i.e. skip revisions that have been scaled to zero.
    NonZeroReplicas,
}

impl ReplicaSetPolicy {
    pub fn admits(&self, is_current: bool, desired_replicas: i32) -> bool {
        match self {
            ReplicaSetPolicy::CurrentRevision => is_current,
            ReplicaSetPolicy::NonZeroReplicas => desired_replicas > 0,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectorConfig {
    #[serde(default = "all_kinds")]
    pub resources: Vec<ResourceKind>,

    #[serde(default)]
    pub namespaces: Vec<String>,

    #[serde(default)]
    pub replica_set_policy: ReplicaSetPolicy,

    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectorConfig {
            resources: all_kinds(),
            namespaces: vec![],
            replica_set_policy: Default::default(),
            interval_seconds: DEFAULT_COLLECTION_INTERVAL_SECONDS,
        }
    }
}

impl CollectorConfig {
    pub fn load(filename: &str) -> anyhow::Result<CollectorConfig> {
        let config: CollectorConfig = serde_yaml::from_reader(File::open(filename)?)?;
        config.validated()
    }

    pub fn validated(mut self) -> anyhow::Result<CollectorConfig> {
        ensure!(self.interval_seconds > 0, "intervalSeconds must be positive");

        let mut seen = vec![];
        self.resources.retain(|kind| {
            if seen.contains(kind) {
                warn!("resource {kind} listed more than once in config, ignoring duplicate");
                return false;
            }
            seen.push(*kind);
            true
        });
        Ok(self)
    }

    pub fn namespace_filter(&self) -> NamespaceFilter {
        NamespaceFilter::new(self.namespaces.iter().cloned())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

fn all_kinds() -> Vec<ResourceKind> {
    ResourceKind::ALL.to_vec()
}

fn default_interval_seconds() -> u64 {
    DEFAULT_COLLECTION_INTERVAL_SECONDS
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn test_empty_config_uses_defaults() {
        let config: CollectorConfig = serde_yaml::from_str("---\n{}").unwrap();
        let config = config.validated().unwrap();

        assert_eq!(config.resources, ResourceKind::ALL.to_vec());
        assert_is_empty!(&config.namespaces);
        assert_eq!(config.replica_set_policy, ReplicaSetPolicy::CurrentRevision);
        assert_eq!(config.interval(), Duration::from_secs(60));
    }

    #[rstest]
    fn test_full_config() {
        let config_yml = "
---
resources:
  - pod
  - replicaset
  - limitrange
namespaces:
  - default
replicaSetPolicy: nonZeroReplicas
intervalSeconds: 15
";
        let config: CollectorConfig = serde_yaml::from_str(config_yml).unwrap();
        let config = config.validated().unwrap();

        assert_eq!(config.resources, vec![ResourceKind::Pod, ResourceKind::ReplicaSet, ResourceKind::LimitRange]);
        assert_eq!(config.namespaces, vec!["default".to_string()]);
        assert_eq!(config.replica_set_policy, ReplicaSetPolicy::NonZeroReplicas);
        assert_eq!(config.interval_seconds, 15);
    }

    #[rstest]
    fn test_duplicate_resources_removed() {
        let config: CollectorConfig = serde_yaml::from_str("resources: [pod, replicaset, pod]").unwrap();
        let config = config.validated().unwrap();
        assert_eq!(config.resources, vec![ResourceKind::Pod, ResourceKind::ReplicaSet]);
    }

    #[rstest]
    fn test_zero_interval_rejected() {
        let config: CollectorConfig = serde_yaml::from_str("intervalSeconds: 0").unwrap();
        assert_err!(config.validated());
    }

    #[rstest]
    fn test_unknown_resource_rejected() {
        assert_err!(serde_yaml::from_str::<CollectorConfig>("resources: [widget]"));
    }

    #[rstest]
    #[case::current_revision(ReplicaSetPolicy::CurrentRevision, true, 0, true)]
    #[case::stale_revision(ReplicaSetPolicy::CurrentRevision, false, 3, false)]
    #[case::non_zero_stale(ReplicaSetPolicy::NonZeroReplicas, false, 3, true)]
    #[case::scaled_to_zero(ReplicaSetPolicy::NonZeroReplicas, true, 0, false)]
    fn test_replica_set_policy(
        #[case] policy: ReplicaSetPolicy,
        #[case] is_current: bool,
        #[case] desired: i32,
        #[case] expected: bool,
    ) {
        assert_eq!(policy.admits(is_current, desired), expected);
    }
}
