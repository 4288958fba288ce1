use std::time::Duration;

use dt_core::errors::*;
use dt_core::k8s::{
    ResourceLister,
    take_snapshot,
};
use dt_core::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::*;

use crate::{
    RunReport,
    TrackedNamespace,
    TrackedResource,
    Transition,
};

err_impl! {TrackerError,
    #[error("initial snapshot is inconclusive: {0}")]
    InconclusiveSnapshot(String),
}

// The DowntimeTracker owns all of the cross-poll state: the set of namespaces and resources that
// were present when the run started, and their downtime histories.  The tracked set is fixed at
// startup; resources that disappear later are never dropped, they just count as down.
#[derive(Clone, Debug)]
pub struct DowntimeTracker {
    namespaces: Vec<TrackedNamespace>,
    start_ts: i64,
}

impl DowntimeTracker {
    // The tracked set is fixed by the first conclusive snapshot, so we keep asking until we get
    // one.  If we're told to stop before that happens there is nothing to track.
    pub async fn initialize(
        lister: &dyn ResourceLister,
        prefix: &str,
        query_timeout: Option<Duration>,
        start_ts: i64,
        stop: &CancellationToken,
    ) -> Option<DowntimeTracker> {
        info!("getting initial list of namespaces and workloads with prefix {prefix}");
        let mut attempts = 0;
        while !stop.is_cancelled() {
            attempts += 1;
            let snapshot = take_snapshot(lister, prefix, query_timeout).await;
            match DowntimeTracker::from_snapshot(&snapshot, start_ts) {
                Ok(tracker) => return Some(tracker),
                Err(err) => warn!("initial snapshot attempt {attempts} failed, retrying: {err}"),
            }
            tokio::task::yield_now().await;
        }
        None
    }

    pub fn from_snapshot(snapshot: &ObservedSnapshot, start_ts: i64) -> anyhow::Result<DowntimeTracker> {
        // Whatever we see here defines what gets tracked for the rest of the run, so we refuse to
        // start from a partial view of the cluster.
        let mut problems: Vec<_> = snapshot
            .failures()
            .into_iter()
            .map(|(kind, reason)| format!("{kind}s: {reason}"))
            .collect();
        if let Listing::QueryFailed(reason) = snapshot.namespaces() {
            problems.push(format!("namespaces: {reason}"));
        }
        if !problems.is_empty() {
            bail!(TrackerError::inconclusive_snapshot(&problems.join("; ")));
        }

        let mut namespaces: Vec<_> = snapshot
            .namespaces()
            .records()
            .iter()
            .map(|name| TrackedNamespace::new(name))
            .collect();

        for kind in ResourceKind::ALL {
            for rec in snapshot.records(kind) {
                match namespaces.iter_mut().find(|ns| ns.name == rec.namespace) {
                    Some(ns) => ns.add_resource(TrackedResource::new(kind, &rec.namespace, &rec.name)),
                    None => debug!("{kind} {}/{} is not in a tracked namespace", rec.namespace, rec.name),
                }
            }
        }

        if namespaces.is_empty() {
            warn!("no namespaces found; nothing will be tracked");
        }
        for ns in &namespaces {
            info!("tracking {} resources in namespace {}", ns.resources().count(), ns.name);
        }

        Ok(DowntimeTracker { namespaces, start_ts })
    }

    pub fn namespaces(&self) -> &[TrackedNamespace] {
        &self.namespaces
    }

    pub fn start_ts(&self) -> i64 {
        self.start_ts
    }

    pub fn namespaces_down(&self) -> usize {
        self.namespaces.iter().filter(|ns| ns.is_down()).count()
    }

    pub fn reconcile(&mut self, snapshot: &ObservedSnapshot, now: i64) {
        for (kind, reason) in snapshot.failures() {
            warn!("skipping {kind}s for this poll: {reason}");
        }

        match snapshot.namespaces() {
            Listing::Records(names) => {
                for ns in self.namespaces.iter().filter(|ns| !names.contains(&ns.name)) {
                    debug!("tracked namespace {} is no longer present", ns.name);
                }
            },
            Listing::QueryFailed(reason) => warn!("could not list namespaces for this poll: {reason}"),
            Listing::Empty => debug!("no namespaces with a matching prefix are present"),
        }

        for ns in self.namespaces.iter_mut() {
            for res in ns.resources_mut() {
                let up = match snapshot.observe(res.kind, &res.namespace, &res.name) {
                    Readiness::Ready => true,
                    Readiness::Unready => false,
                    Readiness::Unknown => continue,
                };

                match res.downtimes.observe(up, now) {
                    Transition::Opened => info!("{} {}/{} is down", res.kind, res.namespace, res.name),
                    Transition::Closed(secs) => {
                        info!("{} {}/{} is back up after {secs}s", res.kind, res.namespace, res.name)
                    },
                    Transition::Unchanged => (),
                }
            }

            // Resources we couldn't observe this time keep whatever state they had before, so the
            // namespace is derived from the children's current state rather than from this
            // snapshot alone.
            let up = ns.is_up();
            match ns.downtimes.observe(up, now) {
                Transition::Opened => info!("namespace {} is down", ns.name),
                Transition::Closed(secs) => info!("namespace {} is back up after {secs}s", ns.name),
                Transition::Unchanged => (),
            }
        }
    }

    pub fn finalize(&mut self, now: i64) {
        for ns in self.namespaces.iter_mut() {
            for res in ns.resources_mut() {
                res.downtimes.close(now);
            }
            ns.downtimes.close(now);
        }
    }

    pub fn recompute_totals(&mut self) {
        for ns in self.namespaces.iter_mut() {
            for res in ns.resources_mut() {
                res.downtime_in_seconds = res.downtimes.total_seconds();
            }
            ns.downtime_in_seconds = ns.downtimes.total_seconds();
        }
    }

    pub fn report(&self, end_ts: i64) -> RunReport {
        RunReport {
            namespaces: self.namespaces.clone(),
            start: self.start_ts,
            end: end_ts,
        }
    }
}
