//! Carrier Infrastructure Layer
//!
//! Two interchangeable `CarrierApi` adapters, selected once at startup:
//!
//! - `RestCarrierClient`: the live carrier API. Credential exchange yields a
//!   bearer token that is used for the shipment-creation and label calls of
//!   one request and then discarded.
//! - `SimulatedCarrier`: no network. Synthesizes shipment and tracking
//!   numbers in the carrier's format and renders a placeholder PDF label,
//!   for environments without carrier credentials.

pub mod pdf;
pub mod rest;
pub mod simulated;

pub use rest::RestCarrierClient;
pub use simulated::SimulatedCarrier;
