use dt_core::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::Downtimes;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedResource {
    pub kind: ResourceKind,
    pub name: String,
    pub namespace: String,
    pub downtimes: Downtimes,
    pub downtime_in_seconds: i64,
}

impl TrackedResource {
    pub fn new(kind: ResourceKind, namespace: &str, name: &str) -> TrackedResource {
        TrackedResource {
            kind,
            name: name.into(),
            namespace: namespace.into(),
            downtimes: Downtimes::new(),
            downtime_in_seconds: 0,
        }
    }

    pub fn is_down(&self) -> bool {
        self.downtimes.is_open()
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedNamespace {
    pub name: String,
    pub deployment_configs: Vec<TrackedResource>,
    pub deployments: Vec<TrackedResource>,
    pub stateful_sets: Vec<TrackedResource>,
    pub downtimes: Downtimes,
    pub downtime_in_seconds: i64,
}

impl TrackedNamespace {
    pub fn new(name: &str) -> TrackedNamespace {
        TrackedNamespace {
            name: name.into(),
            deployment_configs: vec![],
            deployments: vec![],
            stateful_sets: vec![],
            downtimes: Downtimes::new(),
            downtime_in_seconds: 0,
        }
    }

    pub fn add_resource(&mut self, res: TrackedResource) {
        let resources = match res.kind {
            ResourceKind::DeploymentConfig => &mut self.deployment_configs,
            ResourceKind::Deployment => &mut self.deployments,
            ResourceKind::StatefulSet => &mut self.stateful_sets,
        };
        resources.push(res);
    }

    pub fn resources(&self) -> impl Iterator<Item = &TrackedResource> {
        self.deployment_configs
            .iter()
            .chain(self.deployments.iter())
            .chain(self.stateful_sets.iter())
    }

    pub fn resources_mut(&mut self) -> impl Iterator<Item = &mut TrackedResource> {
        self.deployment_configs
            .iter_mut()
            .chain(self.deployments.iter_mut())
            .chain(self.stateful_sets.iter_mut())
    }

    // A namespace with nothing in it has nothing that can be down, so it's always up
    pub fn is_up(&self) -> bool {
        self.resources().all(|res| !res.is_down())
    }

    pub fn is_down(&self) -> bool {
        self.downtimes.is_open()
    }
}
