//! Test Utilities Crate
//!
//! Shared test infrastructure for the parcel-bridge test suite:
//!
//! - `builders`: property-map builders for CRM shipment and contact records
//! - `fixtures`: pre-built addresses and carrier identifiers
//! - `carrier`: a recording wrapper around any `CarrierApi` so tests can
//!   assert on outbound carrier traffic

pub mod builders;
pub mod carrier;
pub mod fixtures;

pub use builders::*;
pub use carrier::*;
pub use fixtures::*;
