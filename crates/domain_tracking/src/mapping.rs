//! Carrier tracking state → CRM property updates
//!
//! Pure mapping with diffing against the record's current values, so a
//! reconciliation pass only patches what actually changed.

use core_kernel::{format_timestamp, props, CrmRecord, PropertyMap, TrackingState};

/// Maps a carrier tracking state onto the CRM properties that differ from
/// the record's current values.
///
/// The delivered timestamp is set only when the carrier reports exactly
/// "Delivered" and the last event carries a timestamp; the event time is
/// taken as the delivery time.
pub fn map_tracking_to_updates(state: &TrackingState, current: &CrmRecord) -> PropertyMap {
    let mut updates = PropertyMap::new();
    let mut set_if_changed = |key: &str, value: String| {
        if current.prop_or_empty(key) != value {
            updates.insert(key.to_string(), value);
        }
    };

    set_if_changed(props::SHIPMENT_STATUS, state.status.clone());

    if let Some(event) = &state.last_event {
        set_if_changed(props::LAST_EVENT_CODE, event.code.clone());
        set_if_changed(props::LAST_EVENT_DESCRIPTION, event.description.clone());
        if let Some(location) = &event.location {
            set_if_changed(props::LAST_EVENT_LOCATION, location.clone());
        }
        if let Some(timestamp) = &event.timestamp {
            set_if_changed(props::LAST_EVENT_TIMESTAMP, format_timestamp(timestamp));
        }
    }

    if let Some(date) = &state.expected_delivery {
        set_if_changed(props::EXPECTED_DELIVERY_DATE, date.format("%Y-%m-%d").to_string());
    }

    if state.status == "Delivered" {
        if let Some(timestamp) = state.last_event.as_ref().and_then(|e| e.timestamp.as_ref()) {
            set_if_changed(props::DELIVERED_DATETIME, format_timestamp(timestamp));
        }
    }

    updates
}
