//! Health scanner background task.
//!
//! Periodically probes every monitor registered with the health registry
//! and stores the boolean results. A probe failure degrades that
//! subsystem's status for the cycle; it never crashes the loop.
//!
//! # Graceful Shutdown
//!
//! The task supports graceful shutdown via a cancellation token. When the
//! token is cancelled, the task completes its current iteration and exits
//! cleanly.

use crate::services::HealthRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Start the health scanner background task.
///
/// This task runs in a loop, scanning all registered monitors on every
/// interval tick. It will exit gracefully when the cancellation token is
/// triggered.
///
/// # Arguments
///
/// * `registry` - Health registry holding the monitors to probe
/// * `scan_interval` - Time between scans
/// * `probe_timeout` - Upper bound for each individual probe
/// * `cancel_token` - Token for graceful shutdown
///
/// # Returns
///
/// Returns when the cancellation token is triggered.
#[instrument(skip_all, name = "ms.task.health_scanner")]
pub async fn start_health_scanner(
    registry: Arc<HealthRegistry>,
    scan_interval: Duration,
    probe_timeout: Duration,
    cancel_token: CancellationToken,
) {
    info!(
        target: "ms.task.health_scanner",
        scan_interval_secs = scan_interval.as_secs(),
        probe_timeout_secs = probe_timeout.as_secs(),
        "Starting health scanner task"
    );

    let mut interval = tokio::time::interval(scan_interval);
    // The first tick fires immediately; skip it so subsystems get one
    // interval to come up before being probed.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                debug!(
                    target: "ms.task.health_scanner",
                    "Scanning systems health status"
                );
                registry.scan(probe_timeout).await;
            }
            _ = cancel_token.cancelled() => {
                info!(
                    target: "ms.task.health_scanner",
                    "Health scanner task received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(
        target: "ms.task.health_scanner",
        "Health scanner task stopped"
    );
}
