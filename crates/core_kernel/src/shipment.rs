//! Shipment status and tracking types
//!
//! The CRM is the system of record for shipments; this module only defines the
//! vocabulary this service reads and writes on CRM records, plus the tracking
//! state shape reported by the carrier.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a shipment record.
///
/// Wire values match the CRM property vocabulary ("Label Printed", not
/// "LabelPrinted"). Carrier-reported statuses outside this set are passed
/// through to the CRM untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipmentStatus {
    /// Record exists, no label yet
    Created,
    /// Label generated and stored
    LabelPrinted,
    /// Carrier has the item
    InTransit,
    /// Delivered to the recipient
    Delivered,
    /// Cancelled before delivery
    Cancelled,
}

impl ShipmentStatus {
    /// Returns the CRM property value for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Created => "Created",
            ShipmentStatus::LabelPrinted => "Label Printed",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Cancelled => "Cancelled",
        }
    }

    /// Parses a CRM property value, if it is one of the known statuses
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Created" => Some(ShipmentStatus::Created),
            "Label Printed" => Some(ShipmentStatus::LabelPrinted),
            "In Transit" => Some(ShipmentStatus::InTransit),
            "Delivered" => Some(ShipmentStatus::Delivered),
            "Cancelled" => Some(ShipmentStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal statuses are excluded from tracking reconciliation
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShipmentStatus::Delivered | ShipmentStatus::Cancelled)
    }

    /// The statuses the reconciler filters out of its search
    pub fn terminal_values() -> [&'static str; 2] {
        [
            ShipmentStatus::Delivered.as_str(),
            ShipmentStatus::Cancelled.as_str(),
        ]
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tracking event reported by the carrier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    /// Carrier event code
    pub code: String,
    /// Human-readable description
    pub description: String,
    /// Location of the event, if reported
    pub location: Option<String>,
    /// Event timestamp, if reported
    pub timestamp: Option<DateTime<Utc>>,
}

/// Current tracking state for one shipment, as reported by the carrier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingState {
    /// Carrier-reported status ("In Transit", "Delivered", ...)
    pub status: String,
    /// Most recent event, if any
    pub last_event: Option<TrackingEvent>,
    /// Estimated delivery date, if reported
    pub expected_delivery: Option<NaiveDate>,
}

/// Formats a timestamp the way CRM datetime properties expect it
/// (RFC3339, whole seconds, trailing `Z`).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// CRM property names used by this service.
///
/// Shipment records and contacts are both plain property maps on the CRM
/// side; these constants keep the two domains and the adapters in agreement.
pub mod props {
    // Shipment record properties
    pub const ORDER_REFERENCE: &str = "order_reference";
    pub const SHIPMENT_STATUS: &str = "shipment_status";
    pub const SENDER_NAME: &str = "sender_name";
    pub const SENDER_LINE1: &str = "sender_line1";
    pub const SENDER_CITY: &str = "sender_city";
    pub const SENDER_POSTAL_CODE: &str = "sender_postal_code";
    pub const SENDER_COUNTRY: &str = "sender_country";
    pub const RECIPIENT_NAME: &str = "recipient_name";
    pub const RECIPIENT_LINE1: &str = "recipient_line1";
    pub const RECIPIENT_CITY: &str = "recipient_city";
    pub const RECIPIENT_POSTAL_CODE: &str = "recipient_postal_code";
    pub const RECIPIENT_COUNTRY: &str = "recipient_country";
    pub const CARRIER_SHIPMENT_NUMBER: &str = "carrier_shipment_number";
    pub const TRACKING_NUMBER: &str = "tracking_number";
    pub const TRACKING_URL: &str = "tracking_url";
    pub const LABEL_FILE_URL: &str = "label_file_url";
    pub const LAST_EVENT_CODE: &str = "last_event_code";
    pub const LAST_EVENT_DESCRIPTION: &str = "last_event_description";
    pub const LAST_EVENT_LOCATION: &str = "last_event_location";
    pub const LAST_EVENT_TIMESTAMP: &str = "last_event_timestamp";
    pub const EXPECTED_DELIVERY_DATE: &str = "expected_delivery_date";
    pub const DELIVERED_DATETIME: &str = "delivered_datetime";

    // Contact properties
    pub const FIRSTNAME: &str = "firstname";
    pub const LASTNAME: &str = "lastname";
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const ZIP: &str = "zip";
    pub const COUNTRY: &str = "country";
    /// Trigger flag flipped before shipment creation so CRM automations fire
    pub const SHIPPING_LABEL_REQUESTED: &str = "shipping_label_requested";
    pub const SHIPMENT_CREATED_AT: &str = "shipment_created_at";
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_round_trips_through_wire_values() {
        for status in [
            ShipmentStatus::Created,
            ShipmentStatus::LabelPrinted,
            ShipmentStatus::InTransit,
            ShipmentStatus::Delivered,
            ShipmentStatus::Cancelled,
        ] {
            assert_eq!(ShipmentStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn unknown_status_does_not_parse() {
        assert_eq!(ShipmentStatus::parse("Returned To Sender"), None);
    }

    #[test]
    fn only_delivered_and_cancelled_are_terminal() {
        assert!(ShipmentStatus::Delivered.is_terminal());
        assert!(ShipmentStatus::Cancelled.is_terminal());
        assert!(!ShipmentStatus::Created.is_terminal());
        assert!(!ShipmentStatus::LabelPrinted.is_terminal());
        assert!(!ShipmentStatus::InTransit.is_terminal());
    }

    #[test]
    fn timestamps_format_with_trailing_z() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-01T00:00:00Z");
    }
}
