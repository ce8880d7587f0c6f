// Condition types promoted to top-level record fields
pub const AVAILABLE_CONDITION: &str = "Available";
pub const PROGRESSING_CONDITION: &str = "Progressing";
pub const REPLICA_FAILURE_CONDITION: &str = "ReplicaFailure";
pub const ABLE_TO_SCALE_CONDITION: &str = "AbleToScale";
pub const SCALING_ACTIVE_CONDITION: &str = "ScalingActive";
pub const SCALING_LIMITED_CONDITION: &str = "ScalingLimited";

// Pod condition types
pub const POD_READY_CONDITION: &str = "Ready";
pub const POD_CONTAINERS_READY_CONDITION: &str = "ContainersReady";
pub const POD_INITIALIZED_CONDITION: &str = "Initialized";
pub const POD_SCHEDULED_CONDITION: &str = "PodScheduled";
pub const POD_UNSCHEDULABLE_REASON: &str = "Unschedulable";

pub const CONDITION_TRUE: &str = "True";
pub const CONDITION_FALSE: &str = "False";

// QoS classes
pub const QOS_GUARANTEED: &str = "Guaranteed";
pub const QOS_BURSTABLE: &str = "Burstable";
pub const QOS_BEST_EFFORT: &str = "BestEffort";

// Resource names
pub const CPU_RESOURCE: &str = "cpu";
pub const MEMORY_RESOURCE: &str = "memory";

// Defaults
pub const DEFAULT_REPLICAS: i32 = 1;
pub const DEFAULT_HPA_MIN_REPLICAS: i32 = 1;
pub const DEFAULT_COLLECTION_INTERVAL_SECONDS: u64 = 60;

// Metrics
pub const SKIPPED_OBJECTS_METRIC: &str = "kubestate_skipped_objects_total";
pub const QUANTITY_FALLBACKS_METRIC: &str = "kubestate_quantity_fallbacks_total";
pub const RECORDS_EMITTED_METRIC: &str = "kubestate_records_emitted_total";
pub const KIND_METRIC_LABEL: &str = "kind";
