//! Ports for the two external systems
//!
//! The service talks to exactly two collaborators: the CRM object store and
//! the carrier's shipment/label API. Each is modeled as an async port trait
//! with swappable adapters:
//!
//! - `CrmApi`: REST adapter in `infra_crm`, in-memory mock for tests
//! - `CarrierApi`: REST adapter and offline simulation in `infra_carrier`,
//!   selected once at startup
//!
//! Domain crates depend only on these traits, never on a concrete adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;
use crate::record::{CrmRecord, PropertyMap, SearchFilter};
use crate::shipment::TrackingState;

/// Error type shared by all port operations.
///
/// Adapters translate transport-level failures (reqwest errors, non-2xx
/// responses) into these variants so the domains and the HTTP layer can
/// classify them without knowing the transport.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// Input failed a precondition check
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The remote system answered with a non-2xx status
    #[error("Upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The remote system could not be reached
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// A payload could not be encoded or decoded
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl std::fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        PortError::Upstream {
            status,
            body: body.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        PortError::Serialization {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Port onto the CRM object store.
///
/// Covers the CRM surface this service consumes: object CRUD, a single-page
/// search, file upload, and record associations. All calls are bearer-token
/// authenticated by the adapter.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// Fetches one record with the given properties
    async fn get_record(
        &self,
        object_type: &str,
        id: &str,
        properties: &[&str],
    ) -> Result<CrmRecord, PortError>;

    /// Creates a record and returns it with its CRM-assigned id
    async fn create_record(
        &self,
        object_type: &str,
        properties: PropertyMap,
    ) -> Result<CrmRecord, PortError>;

    /// Patches properties onto an existing record
    async fn update_record(
        &self,
        object_type: &str,
        id: &str,
        properties: PropertyMap,
    ) -> Result<(), PortError>;

    /// Searches records matching `filter`, first page only, at most `limit`
    async fn search_records(
        &self,
        object_type: &str,
        filter: &SearchFilter,
        properties: &[&str],
        limit: u32,
    ) -> Result<Vec<CrmRecord>, PortError>;

    /// Uploads a file to CRM-hosted storage and returns its public URL
    async fn upload_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, PortError>;

    /// Creates a one-way association between two records.
    ///
    /// Callers wanting a bidirectional link invoke this once per direction.
    async fn associate(
        &self,
        from_object: &str,
        from_id: &str,
        to_object: &str,
        to_id: &str,
    ) -> Result<(), PortError>;

    /// Lists ids of `to_object` records associated with the given record
    async fn associated_ids(
        &self,
        from_object: &str,
        from_id: &str,
        to_object: &str,
    ) -> Result<Vec<String>, PortError>;
}

/// Physical parcel classification sent to the carrier.
///
/// Defaults match the service's fixed business policy: everything ships as a
/// 100 g "Letter" with no declared dimensions. Kept configurable rather than
/// hardcoded at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelSpec {
    pub format: String,
    pub weight_grams: u32,
    pub length_mm: u32,
    pub width_mm: u32,
    pub height_mm: u32,
}

impl Default for ParcelSpec {
    fn default() -> Self {
        Self {
            format: "Letter".to_string(),
            weight_grams: 100,
            length_mm: 0,
            width_mm: 0,
            height_mm: 0,
        }
    }
}

/// Request for carrier shipment creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShipmentRequest {
    /// Carrier service level code
    pub service_code: String,
    /// Caller-side reference attached to the shipment
    pub reference: String,
    pub sender: Address,
    pub recipient: Address,
    pub parcel: ParcelSpec,
}

/// Result of carrier shipment creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedShipment {
    /// Carrier-issued shipment number
    pub shipment_number: String,
    /// Carrier-issued tracking number
    pub tracking_number: String,
    /// Bearer token valid for the follow-up label fetch; used once,
    /// never cached
    pub token: String,
}

/// Port onto the carrier's shipment/label/tracking API.
#[async_trait]
pub trait CarrierApi: Send + Sync {
    /// Authenticates and creates a shipment in one sequence
    async fn create_shipment(
        &self,
        request: &CreateShipmentRequest,
    ) -> Result<CreatedShipment, PortError>;

    /// Fetches the label document (PDF bytes) for a created shipment
    async fn fetch_label(
        &self,
        shipment: &CreatedShipment,
        recipient: &Address,
    ) -> Result<Vec<u8>, PortError>;

    /// Looks up current tracking state; `None` means "no data", a benign
    /// outcome the reconciler skips over
    async fn fetch_tracking(
        &self,
        tracking_number: &str,
    ) -> Result<Option<TrackingState>, PortError>;

    /// True for the offline simulation, surfaced on the health endpoint
    fn is_simulated(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parcel_defaults_match_the_fixed_business_policy() {
        let parcel = ParcelSpec::default();
        assert_eq!(parcel.format, "Letter");
        assert_eq!(parcel.weight_grams, 100);
        assert_eq!(parcel.length_mm, 0);
        assert_eq!(parcel.width_mm, 0);
        assert_eq!(parcel.height_mm, 0);
    }

    #[test]
    fn upstream_errors_carry_status_and_body() {
        let err = PortError::upstream(502, "bad gateway");
        assert_eq!(err.to_string(), "Upstream error (502): bad gateway");
        assert!(!err.is_not_found());
    }
}
