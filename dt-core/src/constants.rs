// Defaults
pub const DEFAULT_NAMESPACE_PREFIX: &str = "redhat-rhmi-";
pub const DEFAULT_OUTPUT_PATH: &str = "downtime.json";

// Env vars
pub const NAMESPACE_PREFIX_ENV_VAR: &str = "NAMESPACE_PREFIX";

// API groups for the tracked workload kinds
pub const APPS_GROUP: &str = "apps";
pub const APPS_OPENSHIFT_GROUP: &str = "apps.openshift.io";
pub const V1_VERSION: &str = "v1";
