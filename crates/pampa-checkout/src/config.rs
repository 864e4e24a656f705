//! # Application Configuration
//!
//! Configuration for the checkout terminal: store identity, AFIP backend,
//! database location.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PAMPA_STORE_CUIT=30712345675                                       │
//! │     PAMPA_AFIP_URL=http://10.0.0.5:3000                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pampa-pos/pampa.toml (Linux)                             │
//! │     ~/Library/Application Support/ar.pampa.pos/pampa.toml (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Point of sale 0001, 30s fiscal timeout, local database             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pampa.toml
//! [store]
//! name = "Dietética La Pampa"
//! cuit = "30712345675"
//! remito_point_of_sale = 1
//!
//! [afip]
//! base_url = "http://localhost:3000"
//! request_timeout_ms = 30000
//!
//! [database]
//! path = "/var/lib/pampa/pampa.db"
//! ```
//!
//! The store CUIT has no usable default: fiscal documents and their QR
//! codes carry it, so `load` refuses to start with an empty or malformed
//! one instead of emitting invoices under a placeholder.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use pampa_core::document::{classify_document, DocumentId};
use pampa_db::DbConfig;
use pampa_fiscal::AfipClient;

use crate::error::{CheckoutError, CheckoutResult};
use crate::service::StoreInfo;

// =============================================================================
// Store Configuration
// =============================================================================

/// Identity of the store running this terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store name as printed on ticket headers.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// The store's CUIT, digits only or with separators ("30-71234567-5").
    /// Required for Factura C emission and the fiscal QR.
    #[serde(default)]
    pub cuit: String,

    /// Point of sale for locally numbered remitos (1-9999).
    /// Factura C numbers come back from AFIP with their own point of sale.
    #[serde(default = "default_remito_point_of_sale")]
    pub remito_point_of_sale: u32,
}

fn default_store_name() -> String {
    "Dietética La Pampa".to_string()
}

fn default_remito_point_of_sale() -> u32 {
    1
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: default_store_name(),
            cuit: String::new(),
            remito_point_of_sale: default_remito_point_of_sale(),
        }
    }
}

// =============================================================================
// AFIP Configuration
// =============================================================================

/// Connection settings for the AFIP invoicing backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AfipConfig {
    /// Base URL of the invoicing backend.
    #[serde(default = "default_afip_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds. A hung backend surfaces as a
    /// timeout error after this long instead of freezing the checkout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_afip_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for AfipConfig {
    fn default() -> Self {
        AfipConfig {
            base_url: default_afip_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

// =============================================================================
// Database Configuration
// =============================================================================

/// Location of the SQLite database file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the database file. Created on first run.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("ar", "pampa", "pos")
        .map(|dirs| dirs.data_dir().join("pampa.db"))
        .unwrap_or_else(|| PathBuf::from("./pampa.db"))
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: default_db_path(),
        }
    }
}

// =============================================================================
// Main Application Configuration
// =============================================================================

/// Complete terminal configuration.
///
/// ## Example Config File
/// ```toml
/// [store]
/// name = "Dietética La Pampa"
/// cuit = "30712345675"
/// remito_point_of_sale = 1
///
/// [afip]
/// base_url = "http://localhost:3000"
/// request_timeout_ms = 30000
///
/// [database]
/// path = "./pampa.db"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Store identity.
    #[serde(default)]
    pub store: StoreConfig,

    /// AFIP backend settings.
    #[serde(default)]
    pub afip: AfipConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (pampa.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CheckoutResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CheckoutResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CheckoutError::InvalidConfig("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CheckoutResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(CheckoutError::InvalidConfig(
                "store.name must not be empty".into(),
            ));
        }

        self.cuit_number()?;

        if self.store.remito_point_of_sale == 0 || self.store.remito_point_of_sale > 9999 {
            return Err(CheckoutError::InvalidConfig(format!(
                "store.remito_point_of_sale must be 1-9999, got {}",
                self.store.remito_point_of_sale
            )));
        }

        let url = &self.afip.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CheckoutError::InvalidConfig(format!(
                "afip.base_url must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.afip.request_timeout_ms == 0 {
            return Err(CheckoutError::InvalidConfig(
                "afip.request_timeout_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("PAMPA_STORE_NAME") {
            self.store.name = name;
        }

        if let Ok(cuit) = std::env::var("PAMPA_STORE_CUIT") {
            debug!(cuit = %cuit, "Overriding store CUIT from environment");
            self.store.cuit = cuit;
        }

        if let Ok(pos) = std::env::var("PAMPA_REMITO_POS") {
            if let Ok(p) = pos.parse::<u32>() {
                self.store.remito_point_of_sale = p;
            } else {
                warn!(pos = %pos, "Ignoring unparseable PAMPA_REMITO_POS");
            }
        }

        if let Ok(url) = std::env::var("PAMPA_AFIP_URL") {
            debug!(url = %url, "Overriding AFIP URL from environment");
            self.afip.base_url = url;
        }

        if let Ok(timeout) = std::env::var("PAMPA_AFIP_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse::<u64>() {
                self.afip.request_timeout_ms = ms;
            } else {
                warn!(timeout = %timeout, "Ignoring unparseable PAMPA_AFIP_TIMEOUT_MS");
            }
        }

        if let Ok(path) = std::env::var("PAMPA_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("ar", "pampa", "pos")
            .map(|dirs| dirs.config_dir().join("pampa.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The store CUIT as a number, for fiscal payloads.
    pub fn cuit_number(&self) -> CheckoutResult<u64> {
        match classify_document(&self.store.cuit) {
            Ok(DocumentId::Cuit(n)) => Ok(n),
            _ => Err(CheckoutError::InvalidConfig(format!(
                "store.cuit must be a valid CUIT, got '{}'",
                self.store.cuit
            ))),
        }
    }

    /// The fiscal request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.afip.request_timeout_ms)
    }

    /// Store identity in the form the checkout service consumes.
    pub fn store_info(&self) -> CheckoutResult<StoreInfo> {
        Ok(StoreInfo {
            name: self.store.name.clone(),
            cuit: self.cuit_number()?,
            remito_point_of_sale: self.store.remito_point_of_sale,
        })
    }

    /// Database settings in the form `Database::new` consumes.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path)
    }

    /// Builds the AFIP client from these settings.
    pub fn afip_client(&self) -> CheckoutResult<AfipClient> {
        Ok(AfipClient::new(&self.afip.base_url, self.request_timeout())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.store.cuit = "30712345675".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.store.remito_point_of_sale, 1);
        assert_eq!(config.afip.request_timeout_ms, 30_000);
        assert!(config.afip.base_url.starts_with("http://"));
    }

    #[test]
    fn test_validation_requires_cuit() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cuit"));
    }

    #[test]
    fn test_validation_rejects_non_cuit_documents() {
        let mut config = valid_config();
        // A DNI is a document, but not the store's CUIT.
        config.store.cuit = "12345678".to_string();
        assert!(config.validate().is_err());

        // 11 digits with a prefix outside the CUIT whitelist.
        config.store.cuit = "12345678901".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_accepts_separated_cuit() {
        let mut config = valid_config();
        config.store.cuit = "30-71234567-5".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.cuit_number().unwrap(), 30712345675);
    }

    #[test]
    fn test_validation_bounds() {
        let mut config = valid_config();
        config.store.remito_point_of_sale = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.afip.base_url = "ftp://somewhere".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.afip.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let source = r#"
            [store]
            name = "Dietética El Trigal"
            cuit = "30712345675"
            remito_point_of_sale = 3

            [afip]
            base_url = "http://10.0.0.5:3000"
            request_timeout_ms = 5000
        "#;

        let config: AppConfig = toml::from_str(source).unwrap();
        assert_eq!(config.store.name, "Dietética El Trigal");
        assert_eq!(config.store.remito_point_of_sale, 3);
        assert_eq!(config.request_timeout(), Duration::from_millis(5000));
        // Section omitted entirely falls back to defaults.
        assert_eq!(config.database.path, default_db_path());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_store_info() {
        let config = valid_config();
        let info = config.store_info().unwrap();
        assert_eq!(info.cuit, 30712345675);
        assert_eq!(info.remito_point_of_sale, 1);
        assert_eq!(info.name, "Dietética La Pampa");
    }
}
