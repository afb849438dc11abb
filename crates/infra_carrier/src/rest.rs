//! HTTP adapter for the live carrier API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use core_kernel::{
    Address, CarrierApi, CreateShipmentRequest, CreatedShipment, ParcelSpec, PortError,
    TrackingState,
};

/// Live carrier adapter.
///
/// Authentication is a client-credentials exchange performed per request;
/// the resulting bearer token covers shipment creation and the follow-up
/// label fetch, then is discarded. No token caching or refresh.
pub struct RestCarrierClient {
    http: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl RestCarrierClient {
    /// Creates a new adapter with an explicit per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, PortError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PortError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    /// Exchanges client credentials for a fresh bearer token
    async fn authenticate(&self) -> Result<String, PortError> {
        let url = format!("{}/security/v1/token", self.base_url);
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let token: TokenResponse = response.json().await.map_err(transport_error)?;
        Ok(token.access_token)
    }
}

fn transport_error(err: reqwest::Error) -> PortError {
    if err.is_timeout() || err.is_connect() {
        PortError::connection(err.to_string())
    } else if err.is_decode() {
        PortError::serialization(err.to_string())
    } else {
        PortError::internal(err.to_string())
    }
}

async fn upstream_error(response: reqwest::Response) -> PortError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    PortError::upstream(status, body)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireShipmentRequest<'a> {
    service_code: &'a str,
    reference: &'a str,
    sender: WireAddress<'a>,
    recipient: WireAddress<'a>,
    parcel: WireParcel,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireAddress<'a> {
    name: &'a str,
    address_line1: &'a str,
    city: &'a str,
    postcode: &'a str,
    country_code: &'a str,
}

impl<'a> From<&'a Address> for WireAddress<'a> {
    fn from(address: &'a Address) -> Self {
        Self {
            name: &address.name,
            address_line1: &address.line1,
            city: &address.city,
            postcode: &address.postal_code,
            country_code: &address.country,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireParcel {
    format: String,
    weight_in_grams: u32,
    length: u32,
    width: u32,
    height: u32,
}

impl From<&ParcelSpec> for WireParcel {
    fn from(parcel: &ParcelSpec) -> Self {
        Self {
            format: parcel.format.clone(),
            weight_in_grams: parcel.weight_grams,
            length: parcel.length_mm,
            width: parcel.width_mm,
            height: parcel.height_mm,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireShipmentResponse {
    shipment_number: String,
    tracking_number: String,
}

#[async_trait]
impl CarrierApi for RestCarrierClient {
    async fn create_shipment(
        &self,
        request: &CreateShipmentRequest,
    ) -> Result<CreatedShipment, PortError> {
        let token = self.authenticate().await?;

        let url = format!("{}/shipping/v1/shipments", self.base_url);
        let body = WireShipmentRequest {
            service_code: &request.service_code,
            reference: &request.reference,
            sender: (&request.sender).into(),
            recipient: (&request.recipient).into(),
            parcel: (&request.parcel).into(),
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let created: WireShipmentResponse = response.json().await.map_err(transport_error)?;
        tracing::info!(
            shipment_number = %created.shipment_number,
            tracking_number = %created.tracking_number,
            "Carrier shipment created"
        );

        Ok(CreatedShipment {
            shipment_number: created.shipment_number,
            tracking_number: created.tracking_number,
            token,
        })
    }

    async fn fetch_label(
        &self,
        shipment: &CreatedShipment,
        _recipient: &Address,
    ) -> Result<Vec<u8>, PortError> {
        let url = format!(
            "{}/shipping/v1/shipments/{}/label",
            self.base_url, shipment.shipment_number
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&shipment.token)
            .query(&[("documentFormat", "PDF")])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(bytes.to_vec())
    }

    /// Open integration point: the carrier's tracking API is not wired up
    /// yet, so live lookups report "no data" rather than guessing at the
    /// carrier's tracking semantics.
    async fn fetch_tracking(
        &self,
        tracking_number: &str,
    ) -> Result<Option<TrackingState>, PortError> {
        tracing::warn!(
            tracking_number,
            "Live carrier tracking lookup is not integrated; reporting no data"
        );
        Ok(None)
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipment_request_serializes_to_carrier_shape() {
        let request = CreateShipmentRequest {
            service_code: "TRACKED-48".to_string(),
            reference: "SHP-9".to_string(),
            sender: Address::new("Acme", "1 Depot Way", "Leeds", "LS1 4AB", "GB"),
            recipient: Address::new("Ada Lovelace", "5 High St", "York", "YO1 7HH", "GB"),
            parcel: ParcelSpec::default(),
        };
        let body = WireShipmentRequest {
            service_code: &request.service_code,
            reference: &request.reference,
            sender: (&request.sender).into(),
            recipient: (&request.recipient).into(),
            parcel: (&request.parcel).into(),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["serviceCode"], "TRACKED-48");
        assert_eq!(json["sender"]["addressLine1"], "1 Depot Way");
        assert_eq!(json["recipient"]["postcode"], "YO1 7HH");
        assert_eq!(json["parcel"]["format"], "Letter");
        assert_eq!(json["parcel"]["weightInGrams"], 100);
    }

    #[test]
    fn shipment_response_parses_carrier_fields() {
        let parsed: WireShipmentResponse = serde_json::from_value(serde_json::json!({
            "shipmentNumber": "RM00123",
            "trackingNumber": "TT123456789GB",
        }))
        .unwrap();
        assert_eq!(parsed.shipment_number, "RM00123");
        assert_eq!(parsed.tracking_number, "TT123456789GB");
    }

    #[tokio::test]
    async fn live_tracking_lookup_is_an_open_integration_point() {
        let client = RestCarrierClient::new("https://api.carrier.example", "id", "secret").unwrap();
        let state = client.fetch_tracking("TT123456789GB").await.unwrap();
        assert!(state.is_none());
    }
}
