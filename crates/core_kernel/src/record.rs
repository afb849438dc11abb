//! CRM record shapes
//!
//! CRM objects are addressed by an object type and an opaque string id, and
//! carry a flat map of string-valued properties. This module defines the
//! record and search shapes the `CrmApi` port exchanges.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CRM object type names used by this service
pub mod objects {
    pub const CONTACTS: &str = "contacts";
    pub const SHIPMENTS: &str = "shipments";
}

/// Flat property map as stored on a CRM record.
///
/// A `BTreeMap` keeps outbound request bodies deterministic, which makes
/// request-body assertions in tests stable.
pub type PropertyMap = BTreeMap<String, String>;

/// One CRM record: an opaque id plus its requested properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmRecord {
    pub id: String,
    pub properties: PropertyMap,
}

impl CrmRecord {
    pub fn new(id: impl Into<String>, properties: PropertyMap) -> Self {
        Self {
            id: id.into(),
            properties,
        }
    }

    /// Returns the property value if present and non-blank
    pub fn prop(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Returns the property value, or `""` when unset
    pub fn prop_or_empty(&self, name: &str) -> &str {
        self.prop(name).unwrap_or("")
    }
}

/// Search filter for CRM record queries.
///
/// Only the `NOT_IN` operator is needed here (the reconciler excludes
/// terminal statuses); the shape mirrors the CRM's search API so the adapter
/// can serialize it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Property the filter applies to
    pub property: String,
    /// Filter operator, CRM search API vocabulary
    pub operator: String,
    /// Operand values
    pub values: Vec<String>,
}

impl SearchFilter {
    /// Matches records whose `property` is not any of `values`
    pub fn not_in<I, S>(property: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            property: property.into(),
            operator: "NOT_IN".to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prop_filters_blank_values() {
        let mut properties = PropertyMap::new();
        properties.insert("tracking_number".to_string(), "  ".to_string());
        properties.insert("shipment_status".to_string(), "Created".to_string());
        let record = CrmRecord::new("101", properties);

        assert_eq!(record.prop("tracking_number"), None);
        assert_eq!(record.prop("shipment_status"), Some("Created"));
        assert_eq!(record.prop("missing"), None);
        assert_eq!(record.prop_or_empty("missing"), "");
    }

    #[test]
    fn not_in_filter_carries_operator_and_values() {
        let filter = SearchFilter::not_in("shipment_status", ["Delivered", "Cancelled"]);
        assert_eq!(filter.operator, "NOT_IN");
        assert_eq!(filter.values, vec!["Delivered", "Cancelled"]);
    }
}
