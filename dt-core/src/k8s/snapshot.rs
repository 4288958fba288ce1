use std::collections::{
    BTreeMap,
    HashMap,
};

use crate::k8s::ResourceKind;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Readiness {
    Ready,
    Unready,

    // The observation can't be used to infer a transition, either because the query for the
    // resource's kind failed or because the record itself was malformed.
    Unknown,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceRecord {
    pub name: String,
    pub namespace: String,
    pub ready_count: Option<i64>,
    pub desired_count: Option<i64>,
}

impl ResourceRecord {
    pub fn new(namespace: &str, name: &str, ready_count: i64, desired_count: i64) -> ResourceRecord {
        ResourceRecord {
            name: name.into(),
            namespace: namespace.into(),
            ready_count: Some(ready_count),
            desired_count: Some(desired_count),
        }
    }

    pub fn readiness(&self) -> Readiness {
        match self.ready_count {
            None => Readiness::Unknown,
            Some(count) if count <= 0 => Readiness::Unready,
            Some(_) => Readiness::Ready,
        }
    }
}

/// The result of one read against the cluster.  `Empty` and `QueryFailed` are deliberately
/// distinct: an empty result is real data (nothing is running, so everything is down), while a
/// failed query tells us nothing at all.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Listing<T> {
    Records(Vec<T>),
    Empty,
    QueryFailed(String),
}

impl<T> Listing<T> {
    pub fn from_records(records: Vec<T>) -> Listing<T> {
        if records.is_empty() { Listing::Empty } else { Listing::Records(records) }
    }

    pub fn records(&self) -> &[T] {
        match self {
            Listing::Records(records) => records,
            _ => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Listing::QueryFailed(_))
    }
}

type RecordKey = (ResourceKind, String, String);

/// A point-in-time view of the cluster, used for exactly one reconciliation pass.
#[derive(Clone, Debug)]
pub struct ObservedSnapshot {
    namespaces: Listing<String>,
    listings: BTreeMap<ResourceKind, Listing<ResourceRecord>>,
    index: HashMap<RecordKey, Readiness>,
}

impl ObservedSnapshot {
    pub fn new(
        namespaces: Listing<String>,
        listings: impl IntoIterator<Item = (ResourceKind, Listing<ResourceRecord>)>,
    ) -> ObservedSnapshot {
        let listings: BTreeMap<_, _> = listings.into_iter().collect();
        let index = listings
            .iter()
            .flat_map(|(kind, listing)| {
                listing
                    .records()
                    .iter()
                    .map(|rec| ((*kind, rec.namespace.clone(), rec.name.clone()), rec.readiness()))
            })
            .collect();

        ObservedSnapshot { namespaces, listings, index }
    }

    pub fn namespaces(&self) -> &Listing<String> {
        &self.namespaces
    }

    pub fn records(&self, kind: ResourceKind) -> &[ResourceRecord] {
        self.listings.get(&kind).map(|l| l.records()).unwrap_or_default()
    }

    // A kind that was never queried is as inconclusive as one whose query failed
    pub fn is_conclusive_for(&self, kind: ResourceKind) -> bool {
        self.listings.get(&kind).is_some_and(|l| !l.is_failed())
    }

    pub fn failures(&self) -> Vec<(ResourceKind, &str)> {
        ResourceKind::ALL
            .iter()
            .filter_map(|kind| match self.listings.get(kind) {
                Some(Listing::QueryFailed(reason)) => Some((*kind, reason.as_str())),
                None => Some((*kind, "not queried")),
                _ => None,
            })
            .collect()
    }

    pub fn observe(&self, kind: ResourceKind, namespace: &str, name: &str) -> Readiness {
        if !self.is_conclusive_for(kind) {
            return Readiness::Unknown;
        }

        // Absent from a conclusive listing means the resource is gone, which counts as down
        self.index
            .get(&(kind, namespace.to_string(), name.to_string()))
            .copied()
            .unwrap_or(Readiness::Unready)
    }
}
