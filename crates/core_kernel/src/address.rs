//! Postal address type shared by both external systems

use serde::{Deserialize, Serialize};

/// A postal address as exchanged with the CRM and the carrier.
///
/// Fields are plain strings because both remote systems store them that way;
/// an empty string means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub name: String,
    pub line1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    pub fn new(
        name: impl Into<String>,
        line1: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            line1: line1.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
        }
    }

    /// Fills each blank field from `defaults`, leaving set fields untouched.
    ///
    /// Used for sender addresses: a shipment record may carry a partial
    /// sender, with the rest coming from configured defaults.
    pub fn merge_defaults(mut self, defaults: &Address) -> Self {
        fn fill(field: &mut String, default: &str) {
            if field.trim().is_empty() {
                *field = default.to_string();
            }
        }
        fill(&mut self.name, &defaults.name);
        fill(&mut self.line1, &defaults.line1);
        fill(&mut self.city, &defaults.city);
        fill(&mut self.postal_code, &defaults.postal_code);
        fill(&mut self.country, &defaults.country);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Address {
        Address::new("Acme Fulfilment", "1 Depot Way", "Leeds", "LS1 4AB", "GB")
    }

    #[test]
    fn blank_fields_take_defaults() {
        let partial = Address::new("", "5 High St", "", "", "GB");
        let merged = partial.merge_defaults(&defaults());

        assert_eq!(merged.name, "Acme Fulfilment");
        assert_eq!(merged.line1, "5 High St");
        assert_eq!(merged.city, "Leeds");
        assert_eq!(merged.postal_code, "LS1 4AB");
        assert_eq!(merged.country, "GB");
    }

    #[test]
    fn fully_unset_address_becomes_the_default() {
        let merged = Address::default().merge_defaults(&defaults());
        assert_eq!(merged, defaults());
    }

    #[test]
    fn whitespace_only_counts_as_unset() {
        let partial = Address::new("  ", "5 High St", "York", "YO1 7HH", "GB");
        let merged = partial.merge_defaults(&defaults());
        assert_eq!(merged.name, "Acme Fulfilment");
    }
}
