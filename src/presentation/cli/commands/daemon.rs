use std::future::Future;
use std::time::Duration;

use crate::application::services::monitor::{MonitorCycleResult, MonitorService};
use crate::domain::ports::collector::SampleError;

/// Run the monitoring loop until `shutdown` resolves.
///
/// Each iteration runs one tick, then sleeps for `interval`. The shutdown
/// future is polled first at both points, so a pending stop request
/// interrupts a sleep (or an in-flight tick) immediately. Errors during
/// individual ticks are logged and never stop the loop.
///
/// Returns the number of ticks that ran to completion or failed sampling.
pub async fn run_daemon<F>(service: &mut MonitorService<'_>, interval: Duration, shutdown: F) -> u64
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => break,
            result = service.run_tick() => {
                ticks += 1;
                log_cycle(&result, interval);
            }
        }

        tokio::select! {
            biased;
            () = &mut shutdown => break,
            () = tokio::time::sleep(interval) => {}
        }
    }

    service.stop();
    tracing::info!("Monitoring stopped by user");
    ticks
}

/// Run exactly one tick.
///
/// Returns `true` when the sample was taken, whatever the alert outcome.
pub async fn run_once(service: &mut MonitorService<'_>) -> bool {
    let result = service.run_tick().await;
    log_cycle(&result, Duration::ZERO);
    service.stop();
    result.is_ok()
}

fn log_cycle(result: &Result<MonitorCycleResult, SampleError>, interval: Duration) {
    match result {
        Ok(cycle) => {
            tracing::debug!(
                "Tick complete: {} breach(es), {} alert(s) sent, {} failed, {} suppressed",
                cycle.breaches.len(),
                cycle.alerts_sent.len(),
                cycle.alerts_failed.len(),
                cycle.alerts_suppressed.len()
            );
        }
        Err(_) if interval.is_zero() => {}
        Err(_) => {
            tracing::warn!(
                "Tick skipped, retrying in {}s",
                interval.as_secs()
            );
        }
    }
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
