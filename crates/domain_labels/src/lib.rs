//! Label Orchestration Domain
//!
//! Drives the multi-step label creation sequence across the CRM and the
//! carrier: fetch CRM state, ensure a shipment record exists, create the
//! carrier shipment, retrieve the label, persist it in CRM file storage,
//! and write results back. Stateless across invocations; everything worth
//! keeping lives in the CRM.

pub mod error;
pub mod orchestrator;

pub use error::LabelError;
pub use orchestrator::{LabelOrchestrator, LabelOutcome, LabelPolicy};
