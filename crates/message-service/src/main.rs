//! Messages Manager
//!
//! Entry point for the message service. Provides message persistence,
//! analysis and easy retrieval over HTTP, with subsystem health
//! monitoring.

use message_service::config::{Config, DatabaseType};
use message_service::repositories::{MemoryRepository, MessageRepository, MongoRepository};
use message_service::routes::{self, AppState};
use message_service::services::HealthRegistry;
use message_service::tasks;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Health monitor id for the MongoDB-backed message repository.
const MONGO_HEALTH_SYSTEM_ID: &str = "mongodb-messages-repository";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "message_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting the Messages Manager service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        database_type = ?config.database_type,
        health_scan_interval_seconds = config.health_scan_interval_seconds,
        "Configuration loaded successfully"
    );

    let health = Arc::new(HealthRegistry::new());

    // Construct the storage backend selected by configuration. A backend
    // that cannot connect at startup is fatal.
    let repository: Arc<dyn MessageRepository> = match config.database_type {
        DatabaseType::Memory => Arc::new(MemoryRepository::new()),
        DatabaseType::Mongo => {
            let mongo = MongoRepository::connect(&config).await.map_err(|e| {
                error!("Could not initialize database connection: {}", e);
                e
            })?;
            health
                .register(Arc::new(mongo.health_monitor(MONGO_HEALTH_SYSTEM_ID)))
                .await;
            Arc::new(mongo)
        }
    };

    // Start the health scanner with each probe bounded so one slow
    // subsystem cannot starve the others within a cycle.
    let cancel_token = CancellationToken::new();
    let probe_timeout = config.database_timeout().min(config.health_scan_interval());
    let scanner = tokio::spawn(tasks::start_health_scanner(
        Arc::clone(&health),
        config.health_scan_interval(),
        probe_timeout,
        cancel_token.clone(),
    ));

    // Parse bind address before moving config
    let bind_address = config.bind_address.clone();

    // Create application state
    let state = Arc::new(AppState { repository, health });

    // Build application routes
    let app = routes::build_routes(state);

    // Parse bind address
    let addr: SocketAddr = bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Messages Manager listening on {}", addr);

    // Start server with graceful shutdown support
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop background tasks and wait for them to finish
    cancel_token.cancel();
    if let Err(e) = scanner.await {
        error!("Health scanner task failed to stop cleanly: {}", e);
    }

    info!("Messages Manager shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
/// Returns when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
