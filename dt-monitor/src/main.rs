mod config;
mod poll_loop;
mod signals;

use clap::Parser;
use clockabilly::prelude::*;
use dt_core::errors::*;
use dt_core::external_storage::ObjectReportStore;
use dt_core::k8s::KubeResourceLister;
use dt_core::logging;
use dt_core::prelude::*;
use dt_store::{
    DowntimeTracker,
    ReportWriter,
};
use tokio_util::sync::CancellationToken;
use tracing::*;

use crate::config::MonitorConfig;
use crate::poll_loop::PollLoop;

#[derive(Clone, Debug, Parser)]
#[command(about = "measure deployment, statefulset, and deployment config downtime per namespace", version)]
pub struct Options {
    #[arg(short, long)]
    config_file: Option<String>,

    #[arg(long, env = NAMESPACE_PREFIX_ENV_VAR)]
    namespace_prefix: Option<String>,

    // Local path or object store URL (s3://, gs://, azure://)
    #[arg(short, long)]
    output: Option<String>,

    #[arg(long)]
    query_timeout: Option<humantime::Duration>,

    #[arg(long)]
    shutdown_grace_period: Option<humantime::Duration>,

    #[arg(short, long, default_value = "info")]
    verbosity: String,
}

#[instrument(ret, err)]
async fn run(opts: Options) -> EmptyResult {
    let config = MonitorConfig::resolve(&opts)?;
    let client = kube::Client::try_default().await?;
    let lister = Box::new(KubeResourceLister::new(client));
    let writer = ReportWriter::new(Box::new(ObjectReportStore::new(&config.output_path)?));
    let clock: Box<dyn Clockable + Send> = UtcClock::boxed();

    // Install the handler before the initial snapshot, which retries until it gets a full view of
    // the cluster; an interrupt has to be able to break out of that too
    let stop = CancellationToken::new();
    signals::cancel_on_signal(stop.clone());

    let Some(tracker) = DowntimeTracker::initialize(
        lister.as_ref(),
        &config.namespace_prefix,
        config.query_timeout,
        clock.now_ts(),
        &stop,
    )
    .await
    else {
        info!("stopped before the initial snapshot completed, nothing to report");
        return Ok(());
    };

    let mut poll_loop = PollLoop::new(tracker, lister, writer, clock, &config);
    let res = poll_loop.run(stop).await;

    signals::wait_for_grace_period(config.shutdown_grace_period).await;
    res
}

#[tokio::main]
async fn main() {
    let opts = Options::parse();
    logging::setup(&opts.verbosity);
    if let Err(err) = run(opts).await {
        error!("downtime monitor failed: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests;
