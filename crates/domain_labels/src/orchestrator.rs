//! Label creation orchestration
//!
//! Two entry modes share one fulfilment tail:
//!
//! - from an existing shipment record: idempotency check, then fulfil
//! - from a contact: validate, flip the automation trigger flag, create the
//!   shipment record and associations, fulfil, then mirror results onto the
//!   contact
//!
//! Side effects commit in a fixed order and a failed step aborts the rest;
//! there is no compensating rollback (operators reconcile manually if the
//! carrier succeeds but a later CRM write fails).

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use core_kernel::{
    format_timestamp, objects, props, Address, CarrierApi, CreateShipmentRequest, CrmApi,
    CrmRecord, ParcelSpec, PropertyMap, ShipmentStatus,
};

use crate::error::LabelError;

/// Shipment properties the orchestrator reads
const SHIPMENT_FETCH_PROPS: &[&str] = &[
    props::ORDER_REFERENCE,
    props::CARRIER_SHIPMENT_NUMBER,
    props::TRACKING_NUMBER,
    props::LABEL_FILE_URL,
    props::SENDER_NAME,
    props::SENDER_LINE1,
    props::SENDER_CITY,
    props::SENDER_POSTAL_CODE,
    props::SENDER_COUNTRY,
    props::RECIPIENT_NAME,
    props::RECIPIENT_LINE1,
    props::RECIPIENT_CITY,
    props::RECIPIENT_POSTAL_CODE,
    props::RECIPIENT_COUNTRY,
];

/// Contact properties the orchestrator reads
const CONTACT_FETCH_PROPS: &[&str] = &[
    props::FIRSTNAME,
    props::LASTNAME,
    props::ADDRESS,
    props::CITY,
    props::ZIP,
    props::COUNTRY,
];

/// Business defaults for label creation.
///
/// The shipped policy is fixed (48-hour tracked service, 100 g "Letter"),
/// but it is carried as configuration rather than constants at the call
/// sites.
#[derive(Debug, Clone, Serialize)]
pub struct LabelPolicy {
    /// Carrier service level code
    pub service_code: String,
    /// Parcel classification sent with every shipment
    pub parcel: ParcelSpec,
    /// Sender fields used when the shipment record leaves them blank
    pub default_sender: Address,
    /// Prefix the tracking number is appended to when building the
    /// human-facing tracking URL
    pub tracking_page_url: String,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            service_code: "TRACKED-48".to_string(),
            parcel: ParcelSpec::default(),
            default_sender: Address::default(),
            tracking_page_url: "https://track.carrier.example/?number=".to_string(),
        }
    }
}

/// Result of a label creation request
#[derive(Debug, Clone, Serialize)]
pub struct LabelOutcome {
    /// CRM shipment record id
    pub record_id: String,
    pub shipment_number: String,
    pub tracking_number: String,
    /// CRM-hosted label URL; empty when the record was already fulfilled
    /// without one on file
    pub label_url: String,
    /// True when the record already carried a carrier shipment number and
    /// no new shipment was created
    pub already_fulfilled: bool,
}

/// Orchestrates label creation across the CRM and the carrier.
pub struct LabelOrchestrator {
    crm: Arc<dyn CrmApi>,
    carrier: Arc<dyn CarrierApi>,
    policy: LabelPolicy,
}

impl LabelOrchestrator {
    pub fn new(crm: Arc<dyn CrmApi>, carrier: Arc<dyn CarrierApi>, policy: LabelPolicy) -> Self {
        Self {
            crm,
            carrier,
            policy,
        }
    }

    /// Creates a label for an existing shipment record.
    ///
    /// Idempotent against CRM state: a record that already carries a
    /// carrier shipment number short-circuits without touching the carrier.
    /// The check is read-then-act, so two invocations racing before either
    /// write commits can still create duplicate carrier shipments; the CRM
    /// offers no conditional write to close that window.
    pub async fn create_from_shipment(&self, record_id: &str) -> Result<LabelOutcome, LabelError> {
        let record = self
            .crm
            .get_record(objects::SHIPMENTS, record_id, SHIPMENT_FETCH_PROPS)
            .await?;

        if let Some(existing) = record.prop(props::CARRIER_SHIPMENT_NUMBER) {
            tracing::info!(
                record_id,
                shipment_number = existing,
                "Shipment already fulfilled; skipping carrier"
            );
            return Ok(LabelOutcome {
                record_id: record_id.to_string(),
                shipment_number: existing.to_string(),
                tracking_number: record.prop_or_empty(props::TRACKING_NUMBER).to_string(),
                label_url: record.prop_or_empty(props::LABEL_FILE_URL).to_string(),
                already_fulfilled: true,
            });
        }

        let sender = sender_from(&record).merge_defaults(&self.policy.default_sender);
        let recipient = recipient_from(&record);
        let reference = record
            .prop(props::ORDER_REFERENCE)
            .unwrap_or(record_id)
            .to_string();

        self.fulfil(record_id, sender, recipient, &reference).await
    }

    /// Creates a shipment record and label starting from a contact.
    ///
    /// Missing address line or postal code on the contact is a validation
    /// failure raised before any write happens.
    pub async fn create_from_contact(&self, contact_id: &str) -> Result<LabelOutcome, LabelError> {
        let contact = self
            .crm
            .get_record(objects::CONTACTS, contact_id, CONTACT_FETCH_PROPS)
            .await?;

        let line1 = contact.prop(props::ADDRESS).ok_or_else(|| {
            LabelError::validation(format!("Contact {contact_id} has no street address"))
        })?;
        let postal_code = contact.prop(props::ZIP).ok_or_else(|| {
            LabelError::validation(format!("Contact {contact_id} has no postal code"))
        })?;

        let recipient = Address::new(
            contact_full_name(&contact),
            line1,
            contact.prop_or_empty(props::CITY),
            postal_code,
            contact
                .prop(props::COUNTRY)
                .unwrap_or(&self.policy.default_sender.country),
        );

        // Trigger flag goes first so CRM automations keyed on it can react
        // even if a later step fails.
        let mut trigger = PropertyMap::new();
        trigger.insert(props::SHIPPING_LABEL_REQUESTED.to_string(), "true".to_string());
        self.crm
            .update_record(objects::CONTACTS, contact_id, trigger)
            .await?;

        let reference = format!("CT-{contact_id}-{}", Utc::now().timestamp());
        let shipment = self
            .crm
            .create_record(objects::SHIPMENTS, new_shipment_properties(
                &reference,
                &self.policy.default_sender,
                &recipient,
            ))
            .await?;
        tracing::info!(contact_id, record_id = %shipment.id, reference = %reference, "Created shipment record for contact");

        self.crm
            .associate(objects::SHIPMENTS, &shipment.id, objects::CONTACTS, contact_id)
            .await?;
        self.crm
            .associate(objects::CONTACTS, contact_id, objects::SHIPMENTS, &shipment.id)
            .await?;

        let outcome = self
            .fulfil(
                &shipment.id,
                self.policy.default_sender.clone(),
                recipient,
                &reference,
            )
            .await?;

        // Mirror onto the contact so CRM automation can react without
        // querying the shipment record.
        let mut mirror = PropertyMap::new();
        mirror.insert(
            props::TRACKING_NUMBER.to_string(),
            outcome.tracking_number.clone(),
        );
        mirror.insert(
            props::SHIPMENT_STATUS.to_string(),
            ShipmentStatus::LabelPrinted.as_str().to_string(),
        );
        mirror.insert(
            props::SHIPMENT_CREATED_AT.to_string(),
            format_timestamp(&Utc::now()),
        );
        self.crm
            .update_record(objects::CONTACTS, contact_id, mirror)
            .await?;

        Ok(outcome)
    }

    /// Shared fulfilment tail: carrier shipment, label, CRM file upload,
    /// shipment record patch.
    async fn fulfil(
        &self,
        record_id: &str,
        sender: Address,
        recipient: Address,
        reference: &str,
    ) -> Result<LabelOutcome, LabelError> {
        let request = CreateShipmentRequest {
            service_code: self.policy.service_code.clone(),
            reference: reference.to_string(),
            sender,
            recipient: recipient.clone(),
            parcel: self.policy.parcel.clone(),
        };

        let created = self.carrier.create_shipment(&request).await?;
        let label = self.carrier.fetch_label(&created, &recipient).await?;

        let file_name = format!("label-{}.pdf", created.tracking_number);
        let label_url = self.crm.upload_file(&file_name, label).await?;

        let tracking_url = format!(
            "{}{}",
            self.policy.tracking_page_url, created.tracking_number
        );

        let mut updates = PropertyMap::new();
        updates.insert(
            props::CARRIER_SHIPMENT_NUMBER.to_string(),
            created.shipment_number.clone(),
        );
        updates.insert(
            props::TRACKING_NUMBER.to_string(),
            created.tracking_number.clone(),
        );
        updates.insert(props::TRACKING_URL.to_string(), tracking_url);
        updates.insert(props::LABEL_FILE_URL.to_string(), label_url.clone());
        updates.insert(
            props::SHIPMENT_STATUS.to_string(),
            ShipmentStatus::LabelPrinted.as_str().to_string(),
        );
        self.crm
            .update_record(objects::SHIPMENTS, record_id, updates)
            .await?;

        tracing::info!(
            record_id,
            shipment_number = %created.shipment_number,
            tracking_number = %created.tracking_number,
            "Label created and persisted"
        );

        Ok(LabelOutcome {
            record_id: record_id.to_string(),
            shipment_number: created.shipment_number,
            tracking_number: created.tracking_number,
            label_url,
            already_fulfilled: false,
        })
    }
}

fn sender_from(record: &CrmRecord) -> Address {
    Address::new(
        record.prop_or_empty(props::SENDER_NAME),
        record.prop_or_empty(props::SENDER_LINE1),
        record.prop_or_empty(props::SENDER_CITY),
        record.prop_or_empty(props::SENDER_POSTAL_CODE),
        record.prop_or_empty(props::SENDER_COUNTRY),
    )
}

fn recipient_from(record: &CrmRecord) -> Address {
    Address::new(
        record.prop_or_empty(props::RECIPIENT_NAME),
        record.prop_or_empty(props::RECIPIENT_LINE1),
        record.prop_or_empty(props::RECIPIENT_CITY),
        record.prop_or_empty(props::RECIPIENT_POSTAL_CODE),
        record.prop_or_empty(props::RECIPIENT_COUNTRY),
    )
}

fn contact_full_name(contact: &CrmRecord) -> String {
    let first = contact.prop_or_empty(props::FIRSTNAME);
    let last = contact.prop_or_empty(props::LASTNAME);
    format!("{first} {last}").trim().to_string()
}

fn new_shipment_properties(
    reference: &str,
    sender: &Address,
    recipient: &Address,
) -> PropertyMap {
    let mut properties = PropertyMap::new();
    let mut set = |key: &str, value: &str| {
        properties.insert(key.to_string(), value.to_string());
    };
    set(props::ORDER_REFERENCE, reference);
    set(
        props::SHIPMENT_STATUS,
        ShipmentStatus::Created.as_str(),
    );
    set(props::SENDER_NAME, &sender.name);
    set(props::SENDER_LINE1, &sender.line1);
    set(props::SENDER_CITY, &sender.city);
    set(props::SENDER_POSTAL_CODE, &sender.postal_code);
    set(props::SENDER_COUNTRY, &sender.country);
    set(props::RECIPIENT_NAME, &recipient.name);
    set(props::RECIPIENT_LINE1, &recipient.line1);
    set(props::RECIPIENT_CITY, &recipient.city);
    set(props::RECIPIENT_POSTAL_CODE, &recipient.postal_code);
    set(props::RECIPIENT_COUNTRY, &recipient.country);
    properties
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_full_name_handles_missing_parts() {
        let mut properties = PropertyMap::new();
        properties.insert(props::LASTNAME.to_string(), "Lovelace".to_string());
        let contact = CrmRecord::new("1", properties);
        assert_eq!(contact_full_name(&contact), "Lovelace");
    }

    #[test]
    fn new_shipment_properties_start_in_created_status() {
        let sender = Address::new("Acme", "1 Depot Way", "Leeds", "LS1 4AB", "GB");
        let recipient = Address::new("Ada", "5 High St", "York", "YO1 7HH", "GB");
        let properties = new_shipment_properties("REF-1", &sender, &recipient);

        assert_eq!(properties.get(props::SHIPMENT_STATUS).unwrap(), "Created");
        assert_eq!(properties.get(props::RECIPIENT_POSTAL_CODE).unwrap(), "YO1 7HH");
        assert!(!properties.contains_key(props::CARRIER_SHIPMENT_NUMBER));
    }

    #[test]
    fn policy_defaults_match_the_shipped_business_policy() {
        let policy = LabelPolicy::default();
        assert_eq!(policy.service_code, "TRACKED-48");
        assert_eq!(policy.parcel.format, "Letter");
        assert_eq!(policy.parcel.weight_grams, 100);
    }
}
