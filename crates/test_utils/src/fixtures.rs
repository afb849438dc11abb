//! Pre-built test data

use core_kernel::Address;

/// Address fixtures used across the test suite
pub struct AddressFixtures;

impl AddressFixtures {
    /// The configured default sender (warehouse)
    pub fn default_sender() -> Address {
        Address::new("Acme Fulfilment", "1 Depot Way", "Leeds", "LS1 4AB", "GB")
    }

    /// A typical recipient
    pub fn recipient() -> Address {
        Address::new("Ada Lovelace", "5 High St", "York", "YO1 7HH", "GB")
    }
}

/// String fixtures for carrier-issued identifiers
pub struct CarrierFixtures;

impl CarrierFixtures {
    pub fn shipment_number() -> &'static str {
        "RM0012345678"
    }

    pub fn tracking_number() -> &'static str {
        "TT123456789GB"
    }

    pub fn label_url() -> &'static str {
        "https://files.crm.example/shipping-labels/label-TT123456789GB.pdf"
    }
}
