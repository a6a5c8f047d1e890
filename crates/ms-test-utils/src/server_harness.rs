//! Test server harness for E2E testing
//!
//! Provides `TestMessageServer` for spawning real message service
//! instances in tests, backed by the in-memory repository.

use message_service::repositories::MemoryRepository;
use message_service::routes::{self, AppState};
use message_service::services::{HealthMonitor, HealthRegistry};
use message_service::tasks;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Test harness for spawning the message service in E2E tests.
///
/// The server binds to a random available port over the in-memory
/// backend; each instance is fully isolated.
pub struct TestMessageServer {
    addr: SocketAddr,
    cancel_token: CancellationToken,
    _handle: JoinHandle<()>,
}

impl TestMessageServer {
    /// Spawn a new test server instance with an empty health registry.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_inner(None).await
    }

    /// Spawn a test server with one registered health monitor and a
    /// running health scanner.
    ///
    /// The scanner polls on `scan_interval`, so tests can use a short
    /// interval to observe status transitions quickly.
    pub async fn spawn_with_monitor(
        monitor: Arc<dyn HealthMonitor>,
        scan_interval: Duration,
    ) -> Result<Self, anyhow::Error> {
        Self::spawn_inner(Some((monitor, scan_interval))).await
    }

    async fn spawn_inner(
        monitor: Option<(Arc<dyn HealthMonitor>, Duration)>,
    ) -> Result<Self, anyhow::Error> {
        let health = Arc::new(HealthRegistry::new());
        let cancel_token = CancellationToken::new();

        if let Some((monitor, scan_interval)) = monitor {
            health.register(monitor).await;
            tokio::spawn(tasks::start_health_scanner(
                Arc::clone(&health),
                scan_interval,
                scan_interval,
                cancel_token.clone(),
            ));
        }

        let state = Arc::new(AppState {
            repository: Arc::new(MemoryRepository::new()),
            health,
        });

        let app = routes::build_routes(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            // The server lives for the duration of the test; errors here
            // surface as failed requests in the test body.
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            cancel_token,
            _handle: handle,
        })
    }

    /// Base URL of the running server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestMessageServer {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        self._handle.abort();
    }
}
