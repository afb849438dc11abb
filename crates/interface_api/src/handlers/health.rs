//! Health endpoints

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::AppState;

/// Plain liveness probe at the root
pub async fn liveness() -> &'static str {
    "parcel-bridge-api is running"
}

/// Health check, including whether the carrier is the offline simulation
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "mock_mode": state.carrier.is_simulated(),
    }))
}
