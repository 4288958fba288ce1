use std::time::Duration;

use clockabilly::prelude::*;
use dt_core::errors::*;
use dt_core::k8s::{
    ResourceLister,
    take_snapshot,
};
use dt_store::{
    DowntimeTracker,
    ReportWriter,
};
use tokio_util::sync::CancellationToken;
use tracing::*;

use crate::config::MonitorConfig;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoopState {
    Running,
    Finalizing,
    Stopped,
}

// The PollLoop is the only thing that ever touches the tracker: one snapshot, one reconcile, one
// report write, strictly in that order, and then right back around again.  There is no delay
// between polls; sampling resolution is bounded only by how fast the apiserver answers.
pub struct PollLoop {
    tracker: DowntimeTracker,
    lister: Box<dyn ResourceLister>,
    writer: ReportWriter,
    clock: Box<dyn Clockable + Send>,
    prefix: String,
    query_timeout: Option<Duration>,
    state: LoopState,
    polls: u64,
}

impl PollLoop {
    pub fn new(
        tracker: DowntimeTracker,
        lister: Box<dyn ResourceLister>,
        writer: ReportWriter,
        clock: Box<dyn Clockable + Send>,
        config: &MonitorConfig,
    ) -> PollLoop {
        PollLoop {
            tracker,
            lister,
            writer,
            clock,
            prefix: config.namespace_prefix.clone(),
            query_timeout: config.query_timeout,
            state: LoopState::Running,
            polls: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn tracker(&self) -> &DowntimeTracker {
        &self.tracker
    }

    // The stop token is only checked between polls, so an in-flight snapshot always gets to
    // finish.  Once it's cancelled we never take another snapshot; we just close out whatever is
    // still open at the stop time and write the final report.
    pub async fn run(&mut self, stop: CancellationToken) -> EmptyResult {
        info!("monitoring downtime, writing reports to {}", self.writer.location());
        while !stop.is_cancelled() {
            self.poll_once().await;
            tokio::task::yield_now().await;
        }

        self.state = LoopState::Finalizing;
        info!("stop requested after {} polls, finalizing downtimes", self.polls);
        let res = self.finalize().await;
        self.state = LoopState::Stopped;
        res
    }

    pub async fn poll_once(&mut self) {
        debug!("getting available deployment configs, deployments and statefulsets");
        let snapshot = take_snapshot(self.lister.as_ref(), &self.prefix, self.query_timeout).await;
        let now = self.clock.now_ts();

        self.tracker.reconcile(&snapshot, now);
        self.tracker.recompute_totals();
        self.polls += 1;
        debug!("poll {} complete at {now}: {} namespaces down", self.polls, self.tracker.namespaces_down());

        if let Err(err) = self.writer.write(&self.tracker.report(now)).await {
            error!("{err:?}");
        }
    }

    async fn finalize(&mut self) -> EmptyResult {
        let now = self.clock.now_ts();
        self.tracker.finalize(now);
        self.tracker.recompute_totals();

        let report = self.tracker.report(now);
        for ns in &report.namespaces {
            info!("namespace {}: {}s of downtime", ns.name, ns.downtime_in_seconds);
        }
        self.writer.write(&report).await?;
        info!("final report written to {}", self.writer.location());
        Ok(())
    }
}
