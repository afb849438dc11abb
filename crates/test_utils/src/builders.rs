//! Test data builders
//!
//! Builders for the CRM property maps the domains read, letting tests set
//! only the fields they care about.

use core_kernel::{props, Address, PropertyMap, ShipmentStatus};

use crate::fixtures::AddressFixtures;

/// Builder for shipment record property maps
#[derive(Debug, Default)]
pub struct ShipmentRecordBuilder {
    properties: PropertyMap,
}

impl ShipmentRecordBuilder {
    /// Starts from an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a typical unfulfilled record: Created status, a
    /// reference, and a recipient, sender left blank
    pub fn unfulfilled() -> Self {
        Self::new()
            .with_status(ShipmentStatus::Created)
            .with_property(props::ORDER_REFERENCE, "ORD-1001")
            .with_recipient(&AddressFixtures::recipient())
    }

    pub fn with_property(mut self, key: &str, value: impl Into<String>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn with_status(self, status: ShipmentStatus) -> Self {
        self.with_property(props::SHIPMENT_STATUS, status.as_str())
    }

    pub fn with_tracking_number(self, tracking: impl Into<String>) -> Self {
        self.with_property(props::TRACKING_NUMBER, tracking)
    }

    pub fn with_carrier_shipment_number(self, number: impl Into<String>) -> Self {
        self.with_property(props::CARRIER_SHIPMENT_NUMBER, number)
    }

    pub fn with_label_file_url(self, url: impl Into<String>) -> Self {
        self.with_property(props::LABEL_FILE_URL, url)
    }

    pub fn with_sender(self, sender: &Address) -> Self {
        self.with_property(props::SENDER_NAME, &sender.name)
            .with_property(props::SENDER_LINE1, &sender.line1)
            .with_property(props::SENDER_CITY, &sender.city)
            .with_property(props::SENDER_POSTAL_CODE, &sender.postal_code)
            .with_property(props::SENDER_COUNTRY, &sender.country)
    }

    pub fn with_recipient(self, recipient: &Address) -> Self {
        self.with_property(props::RECIPIENT_NAME, &recipient.name)
            .with_property(props::RECIPIENT_LINE1, &recipient.line1)
            .with_property(props::RECIPIENT_CITY, &recipient.city)
            .with_property(props::RECIPIENT_POSTAL_CODE, &recipient.postal_code)
            .with_property(props::RECIPIENT_COUNTRY, &recipient.country)
    }

    pub fn build(self) -> PropertyMap {
        self.properties
    }
}

/// Builder for contact property maps
#[derive(Debug, Default)]
pub struct ContactBuilder {
    properties: PropertyMap,
}

impl ContactBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A contact with a complete shippable address
    pub fn shippable() -> Self {
        Self::new()
            .with_name("Ada", "Lovelace")
            .with_property(props::ADDRESS, "5 High St")
            .with_property(props::CITY, "York")
            .with_property(props::ZIP, "YO1 7HH")
            .with_property(props::COUNTRY, "GB")
    }

    pub fn with_property(mut self, key: &str, value: impl Into<String>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn with_name(self, first: &str, last: &str) -> Self {
        self.with_property(props::FIRSTNAME, first)
            .with_property(props::LASTNAME, last)
    }

    pub fn without_property(mut self, key: &str) -> Self {
        self.properties.remove(key);
        self
    }

    pub fn build(self) -> PropertyMap {
        self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfulfilled_shipment_has_no_carrier_number() {
        let properties = ShipmentRecordBuilder::unfulfilled().build();
        assert_eq!(properties.get(props::SHIPMENT_STATUS).unwrap(), "Created");
        assert!(!properties.contains_key(props::CARRIER_SHIPMENT_NUMBER));
    }

    #[test]
    fn shippable_contact_can_drop_fields() {
        let properties = ContactBuilder::shippable().without_property(props::ZIP).build();
        assert!(!properties.contains_key(props::ZIP));
        assert!(properties.contains_key(props::ADDRESS));
    }
}
