pub const TEST_NAMESPACE: &str = "test-namespace";
pub const TEST_OTHER_NAMESPACE: &str = "kube-system";
pub const TEST_DEPLOYMENT: &str = "the-deployment";
pub const TEST_POD: &str = "the-pod";
pub const TEST_NODE: &str = "the-node";
pub const TEST_LIMIT_RANGE: &str = "the-limit-range";
pub const TEST_QUOTA: &str = "the-quota";
pub const TEST_ROLE_BINDING: &str = "the-role-binding";
pub const TEST_HPA: &str = "the-hpa";
pub const TEST_CAPTURE_TS: i64 = 1_700_000_000;
pub const TEST_CREATION_TS: i64 = 1_600_000_000;
