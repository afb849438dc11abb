//! API configuration
//!
//! All configuration is read once at startup and passed explicitly into the
//! components; nothing reads the environment after boot.

use core_kernel::{Address, ParcelSpec};
use domain_labels::LabelPolicy;
use serde::Deserialize;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Shared secret for `/tracking/sync`; checked only when set
    pub inbound_secret: Option<String>,
    /// Search page size for one reconciliation pass
    pub sync_page_limit: u32,
    pub crm: CrmConfig,
    pub carrier: CarrierConfig,
    pub sender: SenderConfig,
}

/// CRM connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrmConfig {
    /// CRM API base URL
    pub base_url: String,
    /// Bearer access token
    pub access_token: String,
    /// Portal identifier for human-facing links; when set, label creation
    /// answers with a browser redirect back into the CRM
    pub portal_id: Option<String>,
    /// Base URL of the CRM's web UI, used to build redirect links
    pub ui_base_url: String,
}

/// Carrier connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CarrierConfig {
    /// Carrier API base URL
    pub base_url: String,
    /// Client-credentials id
    pub client_id: String,
    /// Client-credentials secret
    pub client_secret: String,
    /// Carrier service level code
    pub service_code: String,
    /// Prefix the tracking number is appended to for human-facing links
    pub tracking_page_url: String,
    /// When true, use the offline simulation instead of the live carrier
    pub mock_mode: bool,
    /// Status the simulation reports on tracking lookups; unset means
    /// "no data"
    pub mock_tracking_status: Option<String>,
}

/// Default sender address, used when shipment records leave sender fields
/// blank
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    pub name: String,
    pub line1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            inbound_secret: None,
            sync_page_limit: 100,
            crm: CrmConfig::default(),
            carrier: CarrierConfig::default(),
            sender: SenderConfig::default(),
        }
    }
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.crm.example".to_string(),
            access_token: String::new(),
            portal_id: None,
            ui_base_url: "https://app.crm.example".to_string(),
        }
    }
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.carrier.example".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            service_code: "TRACKED-48".to_string(),
            tracking_page_url: "https://track.carrier.example/?number=".to_string(),
            // Dev-safe default: no live carrier calls without explicit opt-in
            mock_mode: true,
            mock_tracking_status: None,
        }
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            name: "Parcel Bridge Warehouse".to_string(),
            line1: "1 Depot Way".to_string(),
            city: "Leeds".to_string(),
            postal_code: "LS1 4AB".to_string(),
            country: "GB".to_string(),
        }
    }
}

impl SenderConfig {
    /// The configured default sender as a postal address
    pub fn address(&self) -> Address {
        Address::new(
            &self.name,
            &self.line1,
            &self.city,
            &self.postal_code,
            &self.country,
        )
    }
}

impl AppConfig {
    /// Loads configuration from the environment.
    ///
    /// Variables use the `BRIDGE` prefix with `__` separating nesting
    /// levels, e.g. `BRIDGE__CARRIER__MOCK_MODE=false`,
    /// `BRIDGE__CRM__ACCESS_TOKEN=...`. Unset values fall back to defaults.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("BRIDGE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the label policy handed to the orchestrator
    pub fn label_policy(&self) -> LabelPolicy {
        LabelPolicy {
            service_code: self.carrier.service_code.clone(),
            parcel: ParcelSpec::default(),
            default_sender: self.sender.address(),
            tracking_page_url: self.carrier.tracking_page_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_dev_safe() {
        let config = AppConfig::default();
        assert!(config.carrier.mock_mode);
        assert!(config.inbound_secret.is_none());
        assert_eq!(config.sync_page_limit, 100);
    }

    #[test]
    fn label_policy_carries_sender_and_service_defaults() {
        let config = AppConfig::default();
        let policy = config.label_policy();
        assert_eq!(policy.service_code, "TRACKED-48");
        assert_eq!(policy.default_sender.postal_code, "LS1 4AB");
        assert_eq!(policy.parcel.weight_grams, 100);
    }
}
