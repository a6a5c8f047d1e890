//! Health monitor registry.
//!
//! Subsystems that want their health checked register a monitor once at
//! startup. A background task (see `tasks::health_scanner`) probes every
//! registered monitor on a fixed interval and stores the boolean result;
//! request handlers read the aggregated view synchronously.
//!
//! Probes run outside the registry lock, so a slow probe never blocks
//! concurrent readers, and each probe is bounded by a timeout so one
//! slow subsystem cannot starve the others within a cycle.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Interface for any component that wants its health checked and
/// reported.
#[async_trait]
pub trait HealthMonitor: Send + Sync {
    /// The id of the subsystem that wants its health checked.
    fn system_id(&self) -> &str;

    /// Performs the actual health check.
    async fn is_healthy(&self) -> bool;
}

/// Aggregate health of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Every registered monitor reported healthy on its last probe.
    Healthy,

    /// At least one registered monitor is unhealthy.
    Unhealthy,
}

impl HealthStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

struct MonitorEntry {
    monitor: Arc<dyn HealthMonitor>,
    status: bool,
}

/// Registry of monitored subsystems and their last known status.
///
/// Constructed once at process start and shared by reference; statuses
/// are mutated only by the polling loop.
#[derive(Default)]
pub struct HealthRegistry {
    entries: RwLock<HashMap<String, MonitorEntry>>,
}

impl HealthRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a monitor.
    ///
    /// Idempotent per monitor id; the last registration for a given id
    /// wins. A subsystem starts unhealthy until proven otherwise by its
    /// first probe.
    pub async fn register(&self, monitor: Arc<dyn HealthMonitor>) {
        let system_id = monitor.system_id().to_string();

        let mut entries = self.entries.write().await;
        entries.insert(
            system_id,
            MonitorEntry {
                monitor,
                status: false,
            },
        );
    }

    /// Probe every registered monitor once and store the results.
    ///
    /// Monitors are probed sequentially, each bounded by `probe_timeout`;
    /// a probe that times out counts as unhealthy for this cycle. The
    /// registry lock is never held across a probe call.
    pub async fn scan(&self, probe_timeout: Duration) {
        let monitors: Vec<(String, Arc<dyn HealthMonitor>)> = {
            let entries = self.entries.read().await;
            entries
                .iter()
                .map(|(id, entry)| (id.clone(), Arc::clone(&entry.monitor)))
                .collect()
        };

        for (system_id, monitor) in monitors {
            let status = match tokio::time::timeout(probe_timeout, monitor.is_healthy()).await {
                Ok(healthy) => healthy,
                Err(_) => {
                    warn!(
                        target: "ms.health",
                        system_id = %system_id,
                        timeout_ms = probe_timeout.as_millis() as u64,
                        "Health probe timed out"
                    );
                    false
                }
            };

            debug!(
                target: "ms.health",
                system_id = %system_id,
                healthy = status,
                "Health probe completed"
            );

            let mut entries = self.entries.write().await;
            if let Some(entry) = entries.get_mut(&system_id) {
                entry.status = status;
            }
        }
    }

    /// Aggregate view over all registered monitors.
    ///
    /// Healthy iff every monitor's last known status is healthy; an
    /// empty registry is vacuously healthy.
    pub async fn aggregate_status(&self) -> HealthStatus {
        let entries = self.entries.read().await;

        if entries.values().all(|entry| entry.status) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    }
}
