use std::fmt;

use kube::ResourceExt;
use kube::api::{
    ApiResource,
    DynamicObject,
    GroupVersionKind,
};
use serde::{
    Deserialize,
    Serialize,
};
use tracing::*;

use crate::constants::*;
use crate::k8s::ResourceRecord;

// Replica counts that are zero get dropped from the object status by the apiserver, so a missing
// readyReplicas field means "nothing is ready", not "we don't know".  A missing spec.replicas
// field means the controller default of 1.
const READY_REPLICAS_PTR: &str = "/status/readyReplicas";
const DESIRED_REPLICAS_PTR: &str = "/spec/replicas";
const DEFAULT_DESIRED_REPLICAS: i64 = 1;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ResourceKind {
    DeploymentConfig,
    Deployment,
    StatefulSet,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::DeploymentConfig, ResourceKind::Deployment, ResourceKind::StatefulSet];

    pub fn gvk(&self) -> GroupVersionKind {
        match self {
            ResourceKind::DeploymentConfig => GroupVersionKind::gvk(APPS_OPENSHIFT_GROUP, V1_VERSION, "DeploymentConfig"),
            ResourceKind::Deployment => GroupVersionKind::gvk(APPS_GROUP, V1_VERSION, "Deployment"),
            ResourceKind::StatefulSet => GroupVersionKind::gvk(APPS_GROUP, V1_VERSION, "StatefulSet"),
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::DeploymentConfig => "deploymentconfigs",
            ResourceKind::Deployment => "deployments",
            ResourceKind::StatefulSet => "statefulsets",
        }
    }

    // We build the ApiResource by hand instead of going through discovery; the three kinds are
    // fixed, and this saves a round-trip to the apiserver on every poll.
    pub fn api_resource(&self) -> ApiResource {
        ApiResource::from_gvk_with_plural(&self.gvk(), self.plural())
    }

    pub fn record_from(&self, obj: &DynamicObject) -> Option<ResourceRecord> {
        let Some(namespace) = obj.namespace() else {
            warn!("{self} {} has no namespace, skipping", obj.name_any());
            return None;
        };

        let ready_count = match obj.data.pointer(READY_REPLICAS_PTR) {
            None => Some(0),
            Some(val) => val.as_i64(),
        };
        let desired_count = match obj.data.pointer(DESIRED_REPLICAS_PTR) {
            None => Some(DEFAULT_DESIRED_REPLICAS),
            Some(val) => val.as_i64(),
        };

        if ready_count.is_none() {
            warn!("{self} {namespace}/{} has a malformed ready count", obj.name_any());
        }

        Some(ResourceRecord { name: obj.name_any(), namespace, ready_count, desired_count })
    }

    // DeploymentConfigs that are intentionally scaled down to zero are ignored; the other kinds
    // are tracked regardless of their desired count.
    pub fn is_tracked(&self, record: &ResourceRecord) -> bool {
        !(*self == ResourceKind::DeploymentConfig && record.desired_count == Some(0))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ResourceKind::DeploymentConfig => "deployment config",
            ResourceKind::Deployment => "deployment",
            ResourceKind::StatefulSet => "statefulset",
        };
        write!(f, "{name}")
    }
}
