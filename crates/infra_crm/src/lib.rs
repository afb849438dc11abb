//! CRM Infrastructure Layer
//!
//! External adapter for the CRM object store. The CRM is the system of
//! record for contacts and shipment records; this crate gives the domains a
//! `CrmApi` implementation speaking the CRM's REST surface:
//!
//! - Object CRUD (`/crm/v3/objects/{type}`)
//! - Single-page search (`/crm/v3/objects/{type}/search`)
//! - File upload (`/files/v3/files`)
//! - Record associations (`/crm/v4/objects/.../associations`)
//!
//! An in-memory mock adapter is available behind the `mock` feature for
//! tests in dependent crates.

pub mod client;
pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::HttpCrmClient;
