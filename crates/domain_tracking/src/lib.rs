//! Tracking Reconciliation Domain
//!
//! A best-effort single pass that brings CRM shipment records in line with
//! carrier-reported tracking truth: search non-terminal shipments, look up
//! tracking per record, patch changed fields, and mirror status onto
//! associated contacts. No state is kept between passes.

pub mod mapping;
pub mod reconciler;

pub use mapping::map_tracking_to_updates;
pub use reconciler::{SyncReport, TrackingReconciler};
