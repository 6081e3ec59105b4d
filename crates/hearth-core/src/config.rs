//! # Pricing Configuration
//!
//! The data the order total calculator is parameterised by: promotion
//! constants, the country → zone map and the rate table.
//!
//! This module only parses and validates. Finding the file on disk and
//! applying environment overrides is the application's job, since
//! hearth-core does no I/O.
//!
//! ## File Format
//! ```toml
//! [promotions]
//! free_shipping_threshold = "1000.00"
//! promotional_unit_price = "5.00"
//! promotional_keywords = ["pine car", "pinewood", "derby car"]
//!
//! [shipping.zones]
//! home_country = "CA"
//! neighboring_countries = ["US"]
//! north_america = ["MX", "GL", "PM"]
//!
//! [shipping.rates]
//! domestic = [
//!   { max_weight_kg = 1.0, price = "8.50" },
//!   { max_weight_kg = 2.0, price = "12.00" },
//! ]
//! neighboring_country = [{ max_weight_kg = 1.0, price = "12.00" }]
//! north_america = [{ max_weight_kg = 1.0, price = "18.00" }]
//! other_international = [{ max_weight_kg = 1.0, price = "25.00" }]
//! ```
//!
//! Every section is optional; missing sections take the defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::promotion::PromotionConfig;
use crate::shipping::{RateTable, ZoneMap};
use crate::types::DeliveryMethod;

/// Zone map and rate table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingConfig {
    #[serde(default)]
    pub zones: ZoneMap,

    #[serde(default)]
    pub rates: RateTable,
}

/// Everything the calculator needs besides the cart itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub promotions: PromotionConfig,

    #[serde(default)]
    pub shipping: ShippingConfig,
}

impl PricingConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: PricingConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings the type system does not.
    ///
    /// The rate table validates itself on construction; this covers the
    /// promotion constants and the zone map.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.promotions.free_shipping_threshold.is_negative() {
            return Err(ConfigError::InvalidValue {
                field: "promotions.free_shipping_threshold".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        if !self.promotions.promotional_unit_price.is_positive() {
            return Err(ConfigError::InvalidValue {
                field: "promotions.promotional_unit_price".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        self.shipping.zones.validate()
    }

    /// Delivery method for a checkout form: pickup, or shipping to the zone
    /// the country code falls in.
    pub fn delivery_to(&self, country_code: Option<&str>, pickup: bool) -> DeliveryMethod {
        match (pickup, country_code) {
            (false, Some(code)) => DeliveryMethod::Ship {
                zone: self.shipping.zones.zone_for(code),
            },
            // No destination yet: nothing to ship to, so price as pickup
            _ => DeliveryMethod::Pickup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DestinationZone;

    #[test]
    fn test_empty_document_is_default() {
        let config = PricingConfig::from_toml_str("").unwrap();
        assert_eq!(config, PricingConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = PricingConfig::from_toml_str(
            r#"
            [promotions]
            free_shipping_threshold = "150.00"

            [shipping.zones]
            home_country = "US"
            neighboring_countries = ["CA", "MX"]
            "#,
        )
        .unwrap();

        assert_eq!(config.promotions.free_shipping_threshold.cents(), 15_000);
        assert_eq!(config.shipping.zones.zone_for("MX"), DestinationZone::NeighboringCountry);
        assert_eq!(config.shipping.rates, RateTable::default());
    }

    #[test]
    fn test_invalid_documents() {
        assert!(PricingConfig::from_toml_str("[promotions\n").is_err());
        assert!(PricingConfig::from_toml_str(
            r#"
            [promotions]
            promotional_unit_price = "0.00"
            "#
        )
        .is_err());
        assert!(PricingConfig::from_toml_str(
            r#"
            [shipping.rates]
            domestic = [{ max_weight_kg = 1.0, price = "8.50" }]
            "#
        )
        .is_err());
    }

    #[test]
    fn test_delivery_to() {
        let config = PricingConfig::default();
        assert_eq!(config.delivery_to(Some("CA"), true), DeliveryMethod::Pickup);
        assert_eq!(config.delivery_to(None, false), DeliveryMethod::Pickup);
        assert_eq!(
            config.delivery_to(Some("fr"), false),
            DeliveryMethod::Ship {
                zone: DestinationZone::OtherInternational
            }
        );
    }
}
