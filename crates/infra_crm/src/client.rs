//! HTTP adapter for the CRM object store

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use core_kernel::{CrmApi, CrmRecord, PortError, PropertyMap, SearchFilter};

use crate::error::{transport_error, upstream_error};

/// Folder the CRM stores label documents under
const LABEL_FOLDER: &str = "/shipping-labels";

/// CRM REST adapter.
///
/// Every call authenticates with the configured access token; no session or
/// token state is kept between calls.
pub struct HttpCrmClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl HttpCrmClient {
    /// Creates a new adapter with an explicit per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self, PortError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PortError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    fn object_url(&self, object_type: &str) -> String {
        format!("{}/crm/v3/objects/{object_type}", self.base_url)
    }
}

/// Record payload as the CRM returns it; property values may be null
#[derive(Debug, Deserialize)]
struct WireRecord {
    id: String,
    #[serde(default)]
    properties: BTreeMap<String, Option<String>>,
}

impl From<WireRecord> for CrmRecord {
    fn from(wire: WireRecord) -> Self {
        let properties: PropertyMap = wire
            .properties
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();
        CrmRecord::new(wire.id, properties)
    }
}

#[derive(Debug, Serialize)]
struct PropertiesBody<'a> {
    properties: &'a PropertyMap,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody<'a> {
    filter_groups: Vec<FilterGroup<'a>>,
    properties: Vec<String>,
    limit: u32,
}

#[derive(Debug, Serialize)]
struct FilterGroup<'a> {
    filters: Vec<WireFilter<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireFilter<'a> {
    property_name: &'a str,
    operator: &'a str,
    values: &'a [String],
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<WireRecord>,
}

#[derive(Debug, Deserialize)]
struct FileResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct AssociationsResponse {
    #[serde(default)]
    results: Vec<AssociationResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssociationResult {
    to_object_id: serde_json::Value,
}

impl AssociationResult {
    /// The CRM returns numeric ids in some generations and strings in others
    fn id_string(&self) -> String {
        match &self.to_object_id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
impl CrmApi for HttpCrmClient {
    async fn get_record(
        &self,
        object_type: &str,
        id: &str,
        properties: &[&str],
    ) -> Result<CrmRecord, PortError> {
        let url = format!("{}/{id}", self.object_url(object_type));

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("properties", properties.join(","))])
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PortError::not_found(object_type, id));
        }
        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let wire: WireRecord = response.json().await.map_err(transport_error)?;
        Ok(wire.into())
    }

    async fn create_record(
        &self,
        object_type: &str,
        properties: PropertyMap,
    ) -> Result<CrmRecord, PortError> {
        let response = self
            .http
            .post(self.object_url(object_type))
            .bearer_auth(&self.access_token)
            .json(&PropertiesBody {
                properties: &properties,
            })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let wire: WireRecord = response.json().await.map_err(transport_error)?;
        tracing::debug!(object_type, id = %wire.id, "Created CRM record");
        Ok(wire.into())
    }

    async fn update_record(
        &self,
        object_type: &str,
        id: &str,
        properties: PropertyMap,
    ) -> Result<(), PortError> {
        let url = format!("{}/{id}", self.object_url(object_type));

        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.access_token)
            .json(&PropertiesBody {
                properties: &properties,
            })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }
        Ok(())
    }

    async fn search_records(
        &self,
        object_type: &str,
        filter: &SearchFilter,
        properties: &[&str],
        limit: u32,
    ) -> Result<Vec<CrmRecord>, PortError> {
        let url = format!("{}/search", self.object_url(object_type));
        let body = SearchBody {
            filter_groups: vec![FilterGroup {
                filters: vec![WireFilter {
                    property_name: &filter.property,
                    operator: &filter.operator,
                    values: &filter.values,
                }],
            }],
            properties: properties.iter().map(|p| (*p).to_string()).collect(),
            limit,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let parsed: SearchResponse = response.json().await.map_err(transport_error)?;
        Ok(parsed.results.into_iter().map(Into::into).collect())
    }

    async fn upload_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, PortError> {
        let url = format!("{}/files/v3/files", self.base_url);

        let options = serde_json::json!({
            "access": "PUBLIC_NOT_INDEXABLE",
            "overwrite": false,
        });
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| PortError::serialization(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("folderPath", LABEL_FOLDER)
            .text("options", options.to_string());

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let parsed: FileResponse = response.json().await.map_err(transport_error)?;
        tracing::debug!(file_name, url = %parsed.url, "Uploaded file to CRM storage");
        Ok(parsed.url)
    }

    async fn associate(
        &self,
        from_object: &str,
        from_id: &str,
        to_object: &str,
        to_id: &str,
    ) -> Result<(), PortError> {
        let url = format!(
            "{}/crm/v4/objects/{from_object}/{from_id}/associations/default/{to_object}/{to_id}",
            self.base_url
        );

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }
        Ok(())
    }

    async fn associated_ids(
        &self,
        from_object: &str,
        from_id: &str,
        to_object: &str,
    ) -> Result<Vec<String>, PortError> {
        let url = format!(
            "{}/crm/v4/objects/{from_object}/{from_id}/associations/{to_object}",
            self.base_url
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("limit", "100")])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let parsed: AssociationsResponse = response.json().await.map_err(transport_error)?;
        Ok(parsed.results.iter().map(AssociationResult::id_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_record_drops_null_properties() {
        let wire: WireRecord = serde_json::from_value(serde_json::json!({
            "id": "42",
            "properties": {
                "tracking_number": "TT123456789GB",
                "label_file_url": null,
            }
        }))
        .unwrap();

        let record: CrmRecord = wire.into();
        assert_eq!(record.prop("tracking_number"), Some("TT123456789GB"));
        assert_eq!(record.prop("label_file_url"), None);
    }

    #[test]
    fn search_body_serializes_to_crm_shape() {
        let filter = SearchFilter::not_in("shipment_status", ["Delivered", "Cancelled"]);
        let body = SearchBody {
            filter_groups: vec![FilterGroup {
                filters: vec![WireFilter {
                    property_name: &filter.property,
                    operator: &filter.operator,
                    values: &filter.values,
                }],
            }],
            properties: vec!["tracking_number".to_string()],
            limit: 100,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json["filterGroups"][0]["filters"][0]["propertyName"],
            "shipment_status"
        );
        assert_eq!(json["filterGroups"][0]["filters"][0]["operator"], "NOT_IN");
        assert_eq!(json["limit"], 100);
    }

    #[test]
    fn association_ids_accept_numbers_and_strings() {
        let parsed: AssociationsResponse = serde_json::from_value(serde_json::json!({
            "results": [
                {"toObjectId": 1234},
                {"toObjectId": "5678"},
            ]
        }))
        .unwrap();

        let ids: Vec<String> = parsed.results.iter().map(AssociationResult::id_string).collect();
        assert_eq!(ids, vec!["1234", "5678"]);
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = HttpCrmClient::new("https://api.crm.example/", "token").unwrap();
        assert_eq!(
            client.object_url("contacts"),
            "https://api.crm.example/crm/v3/objects/contacts"
        );
    }
}
