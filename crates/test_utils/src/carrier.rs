//! Recording carrier wrapper
//!
//! Wraps any `CarrierApi` and records outbound traffic so tests can assert
//! that the carrier was (or was not) called and inspect request bodies.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use core_kernel::{
    Address, CarrierApi, CreateShipmentRequest, CreatedShipment, PortError, TrackingState,
};

/// `CarrierApi` decorator that records calls and delegates to the inner
/// adapter.
pub struct RecordingCarrier {
    inner: Arc<dyn CarrierApi>,
    create_requests: Mutex<Vec<CreateShipmentRequest>>,
    label_calls: AtomicUsize,
    tracking_calls: AtomicUsize,
}

impl RecordingCarrier {
    pub fn new(inner: Arc<dyn CarrierApi>) -> Self {
        Self {
            inner,
            create_requests: Mutex::new(Vec::new()),
            label_calls: AtomicUsize::new(0),
            tracking_calls: AtomicUsize::new(0),
        }
    }

    /// Number of shipment-creation calls observed
    pub fn create_call_count(&self) -> usize {
        self.create_requests.lock().unwrap().len()
    }

    /// All recorded shipment-creation request bodies
    pub fn create_requests(&self) -> Vec<CreateShipmentRequest> {
        self.create_requests.lock().unwrap().clone()
    }

    /// The most recent shipment-creation request body, if any
    pub fn last_create_request(&self) -> Option<CreateShipmentRequest> {
        self.create_requests.lock().unwrap().last().cloned()
    }

    pub fn label_call_count(&self) -> usize {
        self.label_calls.load(Ordering::SeqCst)
    }

    pub fn tracking_call_count(&self) -> usize {
        self.tracking_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CarrierApi for RecordingCarrier {
    async fn create_shipment(
        &self,
        request: &CreateShipmentRequest,
    ) -> Result<CreatedShipment, PortError> {
        self.create_requests.lock().unwrap().push(request.clone());
        self.inner.create_shipment(request).await
    }

    async fn fetch_label(
        &self,
        shipment: &CreatedShipment,
        recipient: &Address,
    ) -> Result<Vec<u8>, PortError> {
        self.label_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_label(shipment, recipient).await
    }

    async fn fetch_tracking(
        &self,
        tracking_number: &str,
    ) -> Result<Option<TrackingState>, PortError> {
        self.tracking_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_tracking(tracking_number).await
    }

    fn is_simulated(&self) -> bool {
        self.inner.is_simulated()
    }
}
