use std::time::Duration;

use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::*;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("could not install interrupt handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(err) => {
                error!("could not install terminate handler: {err}");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("caught interrupt signal"),
        _ = terminate => info!("caught terminate signal"),
    }
}

pub fn cancel_on_signal(stop: CancellationToken) -> JoinHandle<()> {
    cancel_on(stop, shutdown_signal())
}

pub fn cancel_on<F>(stop: CancellationToken, trigger: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        trigger.await;
        stop.cancel();
    })
}

// Gives whatever is collecting the report a chance to pick it up before the process goes away
pub async fn wait_for_grace_period(grace_period: Duration) {
    if grace_period.is_zero() {
        return;
    }
    info!("waiting {} before exiting", humantime::format_duration(grace_period));
    tokio::time::sleep(grace_period).await;
}
