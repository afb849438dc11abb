//! Parcel Bridge - API Server Binary
//!
//! This binary starts the HTTP glue service between the CRM and the carrier.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration (carrier simulation, no live calls)
//! cargo run --bin parcel-bridge-api
//!
//! # Run against the live carrier
//! BRIDGE__CARRIER__MOCK_MODE=false \
//! BRIDGE__CARRIER__CLIENT_ID=... BRIDGE__CARRIER__CLIENT_SECRET=... \
//! BRIDGE__CRM__ACCESS_TOKEN=... cargo run --bin parcel-bridge-api
//! ```
//!
//! # Environment Variables
//!
//! All variables use the `BRIDGE` prefix with `__` between nesting levels:
//!
//! * `BRIDGE__HOST` / `BRIDGE__PORT` - bind address (default: 0.0.0.0:8080)
//! * `BRIDGE__LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `BRIDGE__INBOUND_SECRET` - shared secret for `/tracking/sync`
//! * `BRIDGE__CRM__BASE_URL` / `BRIDGE__CRM__ACCESS_TOKEN` - CRM connection
//! * `BRIDGE__CRM__PORTAL_ID` - enables browser redirects after label creation
//! * `BRIDGE__CARRIER__MOCK_MODE` - `true` selects the offline simulation
//! * `BRIDGE__CARRIER__CLIENT_ID` / `BRIDGE__CARRIER__CLIENT_SECRET` - carrier credentials
//! * `BRIDGE__SENDER__*` - default sender address fields

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{CarrierApi, CrmApi};
use infra_carrier::{RestCarrierClient, SimulatedCarrier};
use infra_crm::HttpCrmClient;
use interface_api::{config::AppConfig, create_router};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, selects the carrier adapter,
/// and starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Parcel Bridge API Server"
    );

    let crm: Arc<dyn CrmApi> = Arc::new(
        HttpCrmClient::new(&config.crm.base_url, &config.crm.access_token)
            .context("Failed to create CRM client")?,
    );

    let carrier: Arc<dyn CarrierApi> = if config.carrier.mock_mode {
        tracing::warn!("Carrier mock mode active; labels are simulated and not valid for carriage");
        Arc::new(SimulatedCarrier::new(
            config.carrier.mock_tracking_status.clone(),
        ))
    } else {
        Arc::new(
            RestCarrierClient::new(
                &config.carrier.base_url,
                &config.carrier.client_id,
                &config.carrier.client_secret,
            )
            .context("Failed to create carrier client")?,
        )
    };

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("Invalid server address")?;

    let app = create_router(crm, carrier, config);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
