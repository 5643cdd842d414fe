//! rwsync REST API Server
//!
//! This binary starts the connector API, exposing inbound registration and
//! the rejected data-access routes, and runs scheduled batch resync in the
//! background.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use rwsync_core::{TracingReporter, load_connector_config, run_scheduled_resync};

use rwsync_server::{AppState, ServerConfig, build_service, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let config = ServerConfig::parse();

    // Load connector configuration
    let connector_config = load_connector_config(config.connector_config.clone())
        .context("Failed to load connector configuration")?;

    let service = build_service(&config, connector_config.as_ref())
        .context("Failed to initialize registration service")?;
    info!(
        provider = %config.provider,
        item_delay_ms = service.sync_config().item_delay.as_millis() as u64,
        "Registration service ready"
    );

    // Create shutdown token for graceful shutdown
    let shutdown_token = CancellationToken::new();

    // Scheduled resync runs until shutdown
    let resync_handle = {
        let service = service.clone();
        let token = shutdown_token.clone();
        let interval = Duration::from_secs(config.resync_interval_secs);
        tokio::spawn(async move {
            run_scheduled_resync(&service, interval, &TracingReporter, token).await
        })
    };

    let app_state = AppState::new(service);
    let app = create_router(app_state);

    // Bind to address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid address")?;

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Starting rwsync API server on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token))
        .await
        .context("Server error")?;

    let runs = resync_handle.await.context("Resync task panicked")?;
    info!(runs, "Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");

    // Stops the resync loop between items
    shutdown_token.cancel();
}
