//! HTTP API Layer
//!
//! This crate provides the REST surface of the parcel bridge using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: label creation, tracking sync, health
//! - **Middleware**: request logging, tracing
//! - **Error Handling**: one `{"ok": false, "error": ...}` shape everywhere
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{config::AppConfig, create_router};
//!
//! let app = create_router(crm, carrier, AppConfig::from_env()?);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{any, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::{CarrierApi, CrmApi};
use domain_labels::LabelOrchestrator;
use domain_tracking::TrackingReconciler;

use crate::config::AppConfig;
use crate::handlers::{health, labels, tracking};
use crate::middleware::request_log_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<LabelOrchestrator>,
    pub reconciler: Arc<TrackingReconciler>,
    pub carrier: Arc<dyn CarrierApi>,
    pub config: AppConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `crm` - CRM adapter (live client or in-memory mock)
/// * `carrier` - carrier adapter (live client or offline simulation)
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(
    crm: Arc<dyn CrmApi>,
    carrier: Arc<dyn CarrierApi>,
    config: AppConfig,
) -> Router {
    let orchestrator = Arc::new(LabelOrchestrator::new(
        crm.clone(),
        carrier.clone(),
        config.label_policy(),
    ));
    let reconciler = Arc::new(TrackingReconciler::new(
        crm,
        carrier.clone(),
        config.sync_page_limit,
    ));
    let state = AppState {
        orchestrator,
        reconciler,
        carrier,
        config,
    };

    Router::new()
        .route("/", get(health::liveness))
        .route("/health", get(health::health_check))
        // CRM buttons call these with GET or POST depending on configuration
        .route("/labels/create", any(labels::create_from_listing))
        .route("/labels/create-from-contact", any(labels::create_from_contact))
        .route("/tracking/sync", post(tracking::sync))
        .layer(axum_middleware::from_fn(request_log_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
