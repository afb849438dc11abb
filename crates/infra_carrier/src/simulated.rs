//! Offline carrier simulation
//!
//! Used when real carrier credentials are unavailable. Fabricates plausible
//! responses with no network calls: shipment/tracking numbers in the
//! carrier's format and a placeholder PDF label clearly marked as a mock
//! artifact.

use async_trait::async_trait;
use chrono::{Days, Utc};
use rand::Rng;
use uuid::Uuid;

use core_kernel::{
    Address, CarrierApi, CreateShipmentRequest, CreatedShipment, PortError, TrackingEvent,
    TrackingState,
};

use crate::pdf;

/// Prefix of simulated tracking numbers
pub const TRACKING_PREFIX: &str = "TT";
/// Country suffix of simulated tracking numbers
pub const TRACKING_SUFFIX: &str = "GB";
/// Digits between prefix and suffix
pub const TRACKING_DIGITS: usize = 9;

/// Simulated `CarrierApi` implementation.
#[derive(Debug, Default)]
pub struct SimulatedCarrier {
    /// When set, every tracking lookup reports this status; when unset,
    /// lookups report "no data"
    tracking_status: Option<String>,
}

impl SimulatedCarrier {
    pub fn new(tracking_status: Option<String>) -> Self {
        Self { tracking_status }
    }
}

/// Synthesizes a tracking number matching the carrier's numbering
/// convention: prefix + fixed-length numeric + country suffix.
fn synthesize_tracking_number() -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..TRACKING_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10)))
        .collect();
    format!("{TRACKING_PREFIX}{digits}{TRACKING_SUFFIX}")
}

#[async_trait]
impl CarrierApi for SimulatedCarrier {
    async fn create_shipment(
        &self,
        request: &CreateShipmentRequest,
    ) -> Result<CreatedShipment, PortError> {
        let shipment_number = format!("MOCK-{}", Uuid::new_v4().simple());
        let tracking_number = synthesize_tracking_number();

        tracing::info!(
            shipment_number = %shipment_number,
            tracking_number = %tracking_number,
            reference = %request.reference,
            "Simulated carrier shipment created"
        );

        Ok(CreatedShipment {
            shipment_number,
            tracking_number,
            token: "simulated-token".to_string(),
        })
    }

    async fn fetch_label(
        &self,
        shipment: &CreatedShipment,
        recipient: &Address,
    ) -> Result<Vec<u8>, PortError> {
        let lines = vec![
            "*** MOCK SHIPPING LABEL ***".to_string(),
            "NOT VALID FOR CARRIAGE".to_string(),
            String::new(),
            format!("Shipment: {}", shipment.shipment_number),
            format!("Tracking: {}", shipment.tracking_number),
            format!("Deliver to: {}", recipient.name),
            format!("Postcode: {}", recipient.postal_code),
        ];
        Ok(pdf::render_placeholder(&lines))
    }

    async fn fetch_tracking(
        &self,
        tracking_number: &str,
    ) -> Result<Option<TrackingState>, PortError> {
        let Some(status) = &self.tracking_status else {
            return Ok(None);
        };

        tracing::debug!(tracking_number, status = %status, "Simulated tracking lookup");

        let delivered = status == "Delivered";
        Ok(Some(TrackingState {
            status: status.clone(),
            last_event: Some(TrackingEvent {
                code: status.to_uppercase().replace(' ', "_"),
                description: format!("Simulated tracking event: {status}"),
                location: Some("Simulated depot".to_string()),
                timestamp: Some(Utc::now()),
            }),
            expected_delivery: if delivered {
                None
            } else {
                Utc::now().date_naive().checked_add_days(Days::new(2))
            },
        }))
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
