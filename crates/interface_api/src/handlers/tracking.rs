//! Tracking sync endpoint
//!
//! Called by an external scheduler, so it carries its own shared-secret
//! check instead of riding on CRM button semantics.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

const SECRET_HEADER: &str = "x-inbound-secret";

/// Runs one reconciliation pass over non-terminal shipments
pub async fn sync(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    // Secret check happens before any CRM or carrier traffic.
    if let Some(expected) = &state.config.inbound_secret {
        let presented = headers
            .get(SECRET_HEADER)
            .and_then(|value| value.to_str().ok());
        if presented != Some(expected.as_str()) {
            return Err(ApiError::unauthorized("Invalid or missing sync secret"));
        }
    }

    let report = state.reconciler.sync().await?;
    Ok(Json(json!({
        "ok": true,
        "scanned": report.scanned,
        "updated": report.updated,
    })))
}
