use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use kube::ResourceExt;
use kube::api::{
    DynamicObject,
    ListParams,
};
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use tracing::*;

use crate::k8s::{
    Listing,
    ObservedSnapshot,
    ResourceKind,
    ResourceRecord,
};
use crate::prelude::*;

#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait ResourceLister: Send + Sync {
    async fn list_namespaces(&self, prefix: &str) -> Listing<String>;
    async fn list_resources(&self, kind: ResourceKind, prefix: &str) -> Listing<ResourceRecord>;
}

pub struct KubeResourceLister {
    client: kube::Client,
}

impl KubeResourceLister {
    pub fn new(client: kube::Client) -> KubeResourceLister {
        KubeResourceLister { client }
    }
}

#[async_trait]
impl ResourceLister for KubeResourceLister {
    async fn list_namespaces(&self, prefix: &str) -> Listing<String> {
        let ns_api: kube::Api<corev1::Namespace> = kube::Api::all(self.client.clone());
        match ns_api.list(&ListParams::default()).await {
            Ok(list) => Listing::from_records(
                list.items
                    .iter()
                    .map(|ns| ns.name_any())
                    .filter(|name| name.starts_with(prefix))
                    .collect(),
            ),
            Err(err) => Listing::QueryFailed(format!("could not list namespaces: {err}")),
        }
    }

    async fn list_resources(&self, kind: ResourceKind, prefix: &str) -> Listing<ResourceRecord> {
        let api: kube::Api<DynamicObject> = kube::Api::all_with(self.client.clone(), &kind.api_resource());
        let objs = match api.list(&ListParams::default()).await {
            Ok(list) => list.items,

            // The apiserver doesn't serve this kind at all (e.g., DeploymentConfigs on a cluster that
            // isn't OpenShift), so there are definitely none of them.
            Err(kube::Error::Api(kube::core::ErrorResponse { code: 404, .. })) => {
                debug!("{kind} API not found, treating as empty");
                return Listing::Empty;
            },
            Err(err) => return Listing::QueryFailed(format!("could not list {kind}s: {err}")),
        };

        let records = objs
            .iter()
            .filter(|obj| obj.namespace().is_some_and(|ns| ns.starts_with(prefix)))
            .filter_map(|obj| kind.record_from(obj))
            .filter(|rec| kind.is_tracked(rec))
            .collect();
        Listing::from_records(records)
    }
}

/// Read the namespaces and all three tracked kinds.  The individual queries are independent so
/// they're issued concurrently, but this only returns once every one of them has finished (or
/// timed out), so the snapshot never mixes results from different polls.
pub async fn take_snapshot(
    lister: &dyn ResourceLister,
    prefix: &str,
    query_timeout: Option<Duration>,
) -> ObservedSnapshot {
    let (namespaces, dcs, depls, sts) = tokio::join!(
        with_deadline(lister.list_namespaces(prefix), query_timeout),
        with_deadline(lister.list_resources(ResourceKind::DeploymentConfig, prefix), query_timeout),
        with_deadline(lister.list_resources(ResourceKind::Deployment, prefix), query_timeout),
        with_deadline(lister.list_resources(ResourceKind::StatefulSet, prefix), query_timeout),
    );

    ObservedSnapshot::new(
        namespaces,
        [
            (ResourceKind::DeploymentConfig, dcs),
            (ResourceKind::Deployment, depls),
            (ResourceKind::StatefulSet, sts),
        ],
    )
}

async fn with_deadline<T>(query: impl Future<Output = Listing<T>>, query_timeout: Option<Duration>) -> Listing<T> {
    let Some(deadline) = query_timeout else {
        return query.await;
    };

    tokio::time::timeout(deadline, query).await.unwrap_or_else(|_| {
        Listing::QueryFailed(format!("query timed out after {}", humantime::format_duration(deadline)))
    })
}
