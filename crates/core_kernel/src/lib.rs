//! Core Kernel - Foundational types for the parcel-bridge service
//!
//! This crate provides the building blocks shared by the label and tracking
//! domains:
//! - Shipment statuses and tracking event/state types
//! - Postal addresses with per-field default merging
//! - CRM record shapes (string-valued property maps)
//! - Port traits for the two external systems (CRM, carrier)

pub mod address;
pub mod ports;
pub mod record;
pub mod shipment;

pub use address::Address;
pub use ports::{
    CarrierApi, CreateShipmentRequest, CreatedShipment, CrmApi, ParcelSpec, PortError,
};
pub use record::{objects, CrmRecord, PropertyMap, SearchFilter};
pub use shipment::{format_timestamp, props, ShipmentStatus, TrackingEvent, TrackingState};
