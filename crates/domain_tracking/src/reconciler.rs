//! Tracking reconciliation pass

use std::sync::Arc;

use serde::Serialize;

use core_kernel::{
    objects, props, CarrierApi, CrmApi, PortError, PropertyMap, SearchFilter, ShipmentStatus,
};

use crate::mapping::map_tracking_to_updates;

/// Shipment properties a reconciliation pass reads
const SYNC_FETCH_PROPS: &[&str] = &[
    props::TRACKING_NUMBER,
    props::SHIPMENT_STATUS,
    props::LAST_EVENT_CODE,
    props::LAST_EVENT_DESCRIPTION,
    props::LAST_EVENT_LOCATION,
    props::LAST_EVENT_TIMESTAMP,
    props::EXPECTED_DELIVERY_DATE,
    props::DELIVERED_DATETIME,
];

/// Outcome counts of one reconciliation pass
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SyncReport {
    /// Records returned by the non-terminal search
    pub scanned: usize,
    /// Records that received a property patch
    pub updated: usize,
}

/// Aligns CRM shipment records with carrier-reported tracking state.
///
/// One pass covers a single search page (no pagination); overlapping passes
/// are not mutually excluded, but records are processed sequentially within
/// a pass.
pub struct TrackingReconciler {
    crm: Arc<dyn CrmApi>,
    carrier: Arc<dyn CarrierApi>,
    page_limit: u32,
}

impl TrackingReconciler {
    pub fn new(crm: Arc<dyn CrmApi>, carrier: Arc<dyn CarrierApi>, page_limit: u32) -> Self {
        Self {
            crm,
            carrier,
            page_limit,
        }
    }

    /// Runs one reconciliation pass.
    ///
    /// Records without a tracking number and lookups reporting no data are
    /// skipped, not errors; upstream failures abort the pass.
    pub async fn sync(&self) -> Result<SyncReport, PortError> {
        let filter = SearchFilter::not_in(
            props::SHIPMENT_STATUS,
            ShipmentStatus::terminal_values(),
        );
        let records = self
            .crm
            .search_records(objects::SHIPMENTS, &filter, SYNC_FETCH_PROPS, self.page_limit)
            .await?;

        let mut report = SyncReport {
            scanned: records.len(),
            updated: 0,
        };

        for record in records {
            let Some(tracking_number) = record.prop(props::TRACKING_NUMBER) else {
                tracing::debug!(record_id = %record.id, "No tracking number; skipping");
                continue;
            };

            let Some(state) = self.carrier.fetch_tracking(tracking_number).await? else {
                tracing::debug!(record_id = %record.id, tracking_number, "No tracking data; skipping");
                continue;
            };

            let updates = map_tracking_to_updates(&state, &record);
            if updates.is_empty() {
                continue;
            }

            self.crm
                .update_record(objects::SHIPMENTS, &record.id, updates)
                .await?;
            report.updated += 1;

            // Status-only mirror onto every associated contact.
            let contact_ids = self
                .crm
                .associated_ids(objects::SHIPMENTS, &record.id, objects::CONTACTS)
                .await?;
            for contact_id in contact_ids {
                let mut mirror = PropertyMap::new();
                mirror.insert(props::SHIPMENT_STATUS.to_string(), state.status.clone());
                self.crm
                    .update_record(objects::CONTACTS, &contact_id, mirror)
                    .await?;
            }

            tracing::info!(
                record_id = %record.id,
                tracking_number,
                status = %state.status,
                "Shipment tracking reconciled"
            );
        }

        tracing::info!(scanned = report.scanned, updated = report.updated, "Tracking sync complete");
        Ok(report)
    }
}
