//! Label domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors from label orchestration
#[derive(Debug, Error)]
pub enum LabelError {
    /// A required input field was missing; not retryable
    #[error("Validation error: {0}")]
    Validation(String),

    /// An upstream CRM or carrier call failed
    #[error(transparent)]
    Port(#[from] PortError),
}

impl LabelError {
    pub fn validation(message: impl Into<String>) -> Self {
        LabelError::Validation(message.into())
    }

    /// True when the failure is bad input rather than an upstream fault
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LabelError::Validation(_) | LabelError::Port(PortError::Validation { .. })
        )
    }
}
