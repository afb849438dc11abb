//! HTTP error mapping
//!
//! Every error surface renders as `{"ok": false, "error": "..."}` so button
//! scripts and schedulers can branch on a single shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use core_kernel::PortError;
use domain_labels::LabelError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
        (status, Json(json!({ "ok": false, "error": self.to_string() }))).into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Validation { message } => Self::BadRequest(message),
            PortError::NotFound { .. } => Self::BadRequest(err.to_string()),
            PortError::Upstream { .. } | PortError::Connection { .. } => {
                Self::Upstream(err.to_string())
            }
            PortError::Serialization { .. } | PortError::Internal { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<LabelError> for ApiError {
    fn from(err: LabelError) -> Self {
        match err {
            LabelError::Validation(message) => Self::BadRequest(message),
            LabelError::Port(port) => port.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err: ApiError = LabelError::validation("Missing recipient address").into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn upstream_port_errors_map_to_server_errors() {
        let err: ApiError = PortError::upstream(502, "bad gateway").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
