pub const TEST_PREFIX: &str = "test-";
pub const TEST_NAMESPACE: &str = "test-namespace";
pub const TEST_OTHER_NAMESPACE: &str = "test-other-namespace";
pub const TEST_EMPTY_NAMESPACE: &str = "test-empty-namespace";
pub const TEST_UNRELATED_NAMESPACE: &str = "kube-system";

pub const TEST_DEPLOYMENT_CONFIG: &str = "the-deployment-config";
pub const TEST_DEPLOYMENT: &str = "the-deployment";
pub const TEST_STATEFULSET: &str = "the-statefulset";
