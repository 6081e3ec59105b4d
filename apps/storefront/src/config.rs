//! # Store Configuration
//!
//! Everything the storefront needs at startup: store identity, database
//! location, pricing rules and payment settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     HEARTH_DB_PATH=/srv/hearth/hearth.db                               │
//! │     HEARTH_FREE_SHIPPING_THRESHOLD=750.00                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/storefront/hearth.toml (Linux)                           │
//! │     ~/Library/Application Support/com.hearth.storefront/hearth.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     CAD, free shipping from 1000.00, home country CA                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # hearth.toml
//! [store]
//! name = "Hearth & Hand"
//!
//! [database]
//! path = "/srv/hearth/hearth.db"
//!
//! [promotions]
//! free_shipping_threshold = "1000.00"
//!
//! [shipping.zones]
//! home_country = "CA"
//! neighboring_countries = ["US"]
//!
//! [payments]
//! currency = "CAD"
//!
//! [payments.paypal]
//! business = "shop@hearth.example"
//! ```
//!
//! The `[promotions]` and `[shipping]` sections are hearth-core's
//! [`PricingConfig`], read from the same file.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use hearth_core::{Money, PaymentSettings, PricingConfig};

use crate::error::{AppError, AppResult};

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "hearth.toml";

/// Name of the database file inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "hearth.db";

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Shown on payment pages ("Hearth order 1a2b3c4d").
    #[serde(default = "default_store_name")]
    pub name: String,
}

fn default_store_name() -> String {
    "Hearth".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. `None` means the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Store Config
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(flatten)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub payments: PaymentSettings,
}

impl StoreConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from `config_path`, or the default location, if the file exists
    /// 3. Apply `HEARTH_*` environment overrides
    /// 4. Validate
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// file at the default location is not.
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let explicit = config_path.is_some();
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Loading store config from file");
                let contents = std::fs::read_to_string(&path)?;
                Self::from_toml_str(&contents)?
            }
            Some(path) if explicit => {
                return Err(AppError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document without touching the environment.
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let config: StoreConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(AppError::config("store.name must not be empty"));
        }

        self.pricing.validate()?;
        self.payments.validate()?;

        Ok(())
    }

    /// Applies overrides from environment variables.
    fn apply_env_overrides(&mut self) -> AppResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `HEARTH_*` overrides looked up through `lookup`.
    ///
    /// ## Supported Variables
    /// - `HEARTH_DB_PATH`
    /// - `HEARTH_CURRENCY`
    /// - `HEARTH_FREE_SHIPPING_THRESHOLD` (decimal, e.g. `750.00`)
    /// - `HEARTH_HOME_COUNTRY`
    /// - `HEARTH_PAYPAL_BUSINESS`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("HEARTH_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(currency) = lookup("HEARTH_CURRENCY") {
            self.payments.currency = currency.trim().to_ascii_uppercase();
        }

        if let Some(threshold) = lookup("HEARTH_FREE_SHIPPING_THRESHOLD") {
            let amount: Money = threshold.parse().map_err(|e| {
                AppError::config(format!("HEARTH_FREE_SHIPPING_THRESHOLD: {}", e))
            })?;
            debug!(threshold = %amount, "Overriding free shipping threshold from environment");
            self.pricing.promotions.free_shipping_threshold = amount;
        }

        if let Some(country) = lookup("HEARTH_HOME_COUNTRY") {
            debug!(country = %country, "Overriding home country from environment");
            self.pricing.shipping.zones.home_country = country.trim().to_ascii_uppercase();
        }

        if let Some(business) = lookup("HEARTH_PAYPAL_BUSINESS") {
            self.payments.paypal.business = business;
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Resolves the database file, creating the data directory if needed.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.hearth.storefront/hearth.db`
    /// - **Windows**: `%APPDATA%\hearth\storefront\data\hearth.db`
    /// - **Linux**: `~/.local/share/storefront/hearth.db`
    pub fn database_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = project_dirs()
            .ok_or_else(|| AppError::config("Could not determine app data directory"))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "hearth", "storefront")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::DestinationZone;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = StoreConfig::default();
        config.validate().unwrap();

        assert_eq!(config.store.name, "Hearth");
        assert_eq!(config.payments.currency, "CAD");
        assert_eq!(config.pricing.promotions.free_shipping_threshold.cents(), 100_000);
        assert_eq!(config.pricing.shipping.zones.home_country, "CA");
    }

    #[test]
    fn test_parse_full_document() {
        let config = StoreConfig::from_toml_str(
            r#"
            [store]
            name = "Hearth & Hand"

            [database]
            path = "/tmp/hearth-test.db"

            [promotions]
            free_shipping_threshold = "250.00"

            [shipping.zones]
            home_country = "US"
            neighboring_countries = ["CA", "MX"]

            [payments]
            currency = "USD"

            [payments.paypal]
            business = "shop@hearth.example"
            "#,
        )
        .unwrap();

        config.validate().unwrap();
        assert_eq!(config.store.name, "Hearth & Hand");
        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/hearth-test.db")));
        assert_eq!(config.pricing.promotions.free_shipping_threshold.cents(), 25_000);
        assert_eq!(
            config.pricing.shipping.zones.zone_for("ca"),
            DestinationZone::NeighboringCountry
        );
        assert_eq!(config.payments.currency, "USD");
        assert_eq!(config.payments.paypal.business, "shop@hearth.example");
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(StoreConfig::from_toml_str("").unwrap(), StoreConfig::default());
    }

    #[test]
    fn test_malformed_document() {
        let err = StoreConfig::from_toml_str("[promotions\nfree_shipping_threshold = ").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ConfigError);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = StoreConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("HEARTH_DB_PATH", "/var/lib/hearth.db"),
                ("HEARTH_CURRENCY", "usd"),
                ("HEARTH_FREE_SHIPPING_THRESHOLD", "750.00"),
                ("HEARTH_HOME_COUNTRY", " us "),
                ("HEARTH_PAYPAL_BUSINESS", "owner@hearth.example"),
            ]))
            .unwrap();

        assert_eq!(config.database.path, Some(PathBuf::from("/var/lib/hearth.db")));
        assert_eq!(config.payments.currency, "USD");
        assert_eq!(config.pricing.promotions.free_shipping_threshold.cents(), 75_000);
        assert_eq!(config.pricing.shipping.zones.home_country, "US");
        assert_eq!(config.payments.paypal.business, "owner@hearth.example");
    }

    #[test]
    fn test_bad_threshold_override_is_rejected() {
        let mut config = StoreConfig::default();
        let err = config
            .apply_overrides(lookup_from(&[("HEARTH_FREE_SHIPPING_THRESHOLD", "lots")]))
            .unwrap_err();
        assert!(err.message.contains("HEARTH_FREE_SHIPPING_THRESHOLD"));
    }

    #[test]
    fn test_no_overrides_leaves_config_untouched() {
        let mut config = StoreConfig::default();
        config.apply_overrides(|_| None).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = StoreConfig::default();
        config.store.name = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = StoreConfig::default();
        config.payments.currency = "DOLLARS".to_string();
        assert!(config.validate().is_err());

        let mut config = StoreConfig::default();
        config.pricing.promotions.free_shipping_threshold = Money::from_cents(-1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = StoreConfig::load(Some(PathBuf::from("/definitely/not/here/hearth.toml")))
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ConfigError);
    }

    #[test]
    fn test_explicit_database_path_is_used() {
        let mut config = StoreConfig::default();
        config.database.path = Some(PathBuf::from("/tmp/explicit.db"));
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/explicit.db"));
    }
}
