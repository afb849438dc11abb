//! Label creation endpoints
//!
//! Both endpoints are wired to CRM workflow buttons, which call them with
//! either query parameters or a small JSON body depending on how the button
//! is configured. Responses are JSON unless a CRM portal is configured, in
//! which case the browser is sent back to the record it came from.

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use core_kernel::objects;
use domain_labels::LabelOutcome;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::AppState;

/// Record ids as CRM buttons send them
#[derive(Debug, Default, Deserialize)]
pub struct LabelParams {
    #[serde(rename = "listingId")]
    pub listing_id: Option<String>,
    #[serde(rename = "contactId")]
    pub contact_id: Option<String>,
}

impl LabelParams {
    fn merged(query: Self, body: Option<Self>) -> Self {
        let body = body.unwrap_or_default();
        Self {
            listing_id: query.listing_id.or(body.listing_id),
            contact_id: query.contact_id.or(body.contact_id),
        }
    }
}

/// Creates a label for an existing shipment record
pub async fn create_from_listing(
    State(state): State<AppState>,
    Query(query): Query<LabelParams>,
    body: Option<Json<LabelParams>>,
) -> Result<Response, ApiError> {
    let params = LabelParams::merged(query, body.map(|Json(b)| b));
    let listing_id = params
        .listing_id
        .ok_or_else(|| ApiError::bad_request("Missing listingId parameter"))?;

    let outcome = state.orchestrator.create_from_shipment(&listing_id).await?;
    Ok(respond(&state, outcome))
}

/// Creates a shipment record plus label directly from a contact
pub async fn create_from_contact(
    State(state): State<AppState>,
    Query(query): Query<LabelParams>,
    body: Option<Json<LabelParams>>,
) -> Result<Response, ApiError> {
    let params = LabelParams::merged(query, body.map(|Json(b)| b));
    let contact_id = params
        .contact_id
        .ok_or_else(|| ApiError::bad_request("Missing contactId parameter"))?;

    let outcome = state.orchestrator.create_from_contact(&contact_id).await?;
    Ok(respond(&state, outcome))
}

fn respond(state: &AppState, outcome: LabelOutcome) -> Response {
    // Buttons opened in a browser tab get bounced back to the CRM record;
    // everything else gets JSON. Both flows land on the shipment record,
    // which is where the label link lives.
    if let Some(portal_id) = &state.config.crm.portal_id {
        let target = format!(
            "{}/contacts/{}/record/{}/{}",
            state.config.crm.ui_base_url, portal_id, objects::SHIPMENTS, outcome.record_id
        );
        return Html(redirect_page(&target)).into_response();
    }

    Json(json!({
        "ok": true,
        "listingId": outcome.record_id,
        "shipmentNumber": outcome.shipment_number,
        "trackingNumber": outcome.tracking_number,
        "labelUrl": outcome.label_url,
    }))
    .into_response()
}

fn redirect_page(target: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head>\
         <meta http-equiv=\"refresh\" content=\"0; url={target}\">\
         </head><body>Label created. Returning to the record&hellip;</body></html>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_ids_win_over_body_ids() {
        let query = LabelParams {
            listing_id: Some("101".to_string()),
            contact_id: None,
        };
        let body = LabelParams {
            listing_id: Some("202".to_string()),
            contact_id: Some("303".to_string()),
        };
        let merged = LabelParams::merged(query, Some(body));
        assert_eq!(merged.listing_id.as_deref(), Some("101"));
        assert_eq!(merged.contact_id.as_deref(), Some("303"));
    }

    #[test]
    fn redirect_page_embeds_the_target() {
        let page = redirect_page("https://app.crm.example/contacts/123/record/shipments/9");
        assert!(page.contains("url=https://app.crm.example/contacts/123/record/shipments/9"));
    }
}
