//! # Promotion Rules
//!
//! Conditions that waive shipping entirely.
//!
//! ## Evaluation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PromotionRule::PRIORITY (first match wins, the rest are skipped)       │
//! │                                                                         │
//! │  1. Pickup                 delivery == pickup                           │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │  2. PromotionalSku         any line at the promotional unit price       │
//! │        │ no                whose name/category contains a keyword       │
//! │        ▼                                                                │
//! │  3. FreeShippingThreshold  subtotal ≥ threshold                         │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │  (no waiver: rate table decides)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rules are not commutative in what they *report*: a pickup order over
//! the threshold is recorded as waived by `Pickup`, never by the threshold.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CartLine, DeliveryMethod};

// =============================================================================
// Promotion Configuration
// =============================================================================

/// Tunable promotion constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionConfig {
    /// Orders with a subtotal at or above this ship free.
    #[serde(with = "crate::money::decimal", default = "default_threshold")]
    pub free_shipping_threshold: Money,

    /// Unit price that marks a promotional item.
    #[serde(with = "crate::money::decimal", default = "default_promotional_price")]
    pub promotional_unit_price: Money,

    /// Case-insensitive substrings matched against line name and category.
    #[serde(default = "default_keywords")]
    pub promotional_keywords: Vec<String>,
}

fn default_threshold() -> Money {
    Money::from_cents(100_000)
}

fn default_promotional_price() -> Money {
    Money::from_cents(500)
}

fn default_keywords() -> Vec<String> {
    vec![
        "pine car".to_string(),
        "pinewood".to_string(),
        "derby car".to_string(),
    ]
}

impl Default for PromotionConfig {
    fn default() -> Self {
        PromotionConfig {
            free_shipping_threshold: default_threshold(),
            promotional_unit_price: default_promotional_price(),
            promotional_keywords: default_keywords(),
        }
    }
}

impl PromotionConfig {
    /// True when the line is a promotional item.
    ///
    /// Both conditions must hold: the exact promotional unit price, and a
    /// keyword found in the name or category.
    pub fn is_promotional(&self, line: &CartLine) -> bool {
        if line.unit_price != self.promotional_unit_price {
            return false;
        }

        let name = line.name.to_lowercase();
        let category = line.category.as_deref().unwrap_or_default().to_lowercase();

        self.promotional_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .any(|k| name.contains(&k) || category.contains(&k))
    }
}

// =============================================================================
// Promotion Rules
// =============================================================================

/// What the rules look at.
#[derive(Debug, Clone, Copy)]
pub struct PromotionInput<'a> {
    pub lines: &'a [CartLine],
    pub subtotal: Money,
    pub delivery: DeliveryMethod,
}

/// A shipping-waiver rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PromotionRule {
    Pickup,
    PromotionalSku,
    FreeShippingThreshold,
}

impl PromotionRule {
    /// Evaluation order. Do not reorder: pickup must short-circuit before
    /// the promotional-SKU and threshold checks.
    pub const PRIORITY: [PromotionRule; 3] = [
        PromotionRule::Pickup,
        PromotionRule::PromotionalSku,
        PromotionRule::FreeShippingThreshold,
    ];

    /// Evaluates this rule alone.
    pub fn applies(&self, input: &PromotionInput<'_>, config: &PromotionConfig) -> bool {
        match self {
            PromotionRule::Pickup => input.delivery.is_pickup(),
            PromotionRule::PromotionalSku => {
                input.lines.iter().any(|line| config.is_promotional(line))
            }
            PromotionRule::FreeShippingThreshold => {
                input.subtotal >= config.free_shipping_threshold
            }
        }
    }

    /// Returns the first rule in [`PromotionRule::PRIORITY`] that applies.
    pub fn first_match(input: &PromotionInput<'_>, config: &PromotionConfig) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|rule| rule.applies(input, config))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DestinationZone;

    fn line(name: &str, category: Option<&str>, cents: i64) -> CartLine {
        CartLine {
            product_id: name.to_string(),
            sku: String::new(),
            name: name.to_string(),
            category: category.map(str::to_string),
            unit_price: Money::from_cents(cents),
            weight_kg: Some(0.3),
            quantity: 1,
        }
    }

    fn ship_domestic() -> DeliveryMethod {
        DeliveryMethod::Ship {
            zone: DestinationZone::Domestic,
        }
    }

    #[test]
    fn test_promotional_needs_price_and_keyword() {
        let config = PromotionConfig::default();

        assert!(config.is_promotional(&line("Pine Car Kit", None, 500)));
        assert!(config.is_promotional(&line("Racer", Some("Pinewood Derby"), 500)));
        // Right keyword, wrong price
        assert!(!config.is_promotional(&line("pine car", None, 550)));
        // Right price, no keyword
        assert!(!config.is_promotional(&line("Felt Coaster", None, 500)));
    }

    #[test]
    fn test_blank_keywords_never_match() {
        let config = PromotionConfig {
            promotional_keywords: vec!["  ".to_string(), String::new()],
            ..PromotionConfig::default()
        };
        assert!(!config.is_promotional(&line("anything", None, 500)));
    }

    #[test]
    fn test_pickup_wins_over_everything() {
        let config = PromotionConfig::default();
        let lines = vec![line("pine car", None, 500)];
        let input = PromotionInput {
            lines: &lines,
            subtotal: Money::from_cents(500_000),
            delivery: DeliveryMethod::Pickup,
        };
        assert_eq!(
            PromotionRule::first_match(&input, &config),
            Some(PromotionRule::Pickup)
        );
    }

    #[test]
    fn test_promotional_sku_before_threshold() {
        let config = PromotionConfig::default();
        let lines = vec![line("pine car", None, 500)];
        let input = PromotionInput {
            lines: &lines,
            subtotal: Money::from_cents(500_000),
            delivery: ship_domestic(),
        };
        assert_eq!(
            PromotionRule::first_match(&input, &config),
            Some(PromotionRule::PromotionalSku)
        );
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let config = PromotionConfig::default();
        let lines = vec![line("Walnut Bowl", None, 100_000)];

        let at = PromotionInput {
            lines: &lines,
            subtotal: config.free_shipping_threshold,
            delivery: ship_domestic(),
        };
        assert_eq!(
            PromotionRule::first_match(&at, &config),
            Some(PromotionRule::FreeShippingThreshold)
        );

        let below = PromotionInput {
            subtotal: config.free_shipping_threshold - Money::from_cents(1),
            ..at
        };
        assert_eq!(PromotionRule::first_match(&below, &config), None);
    }

    #[test]
    fn test_config_from_toml_uses_defaults() {
        let config: PromotionConfig = toml::from_str(r#"free_shipping_threshold = "250.00""#).unwrap();
        assert_eq!(config.free_shipping_threshold.cents(), 25_000);
        assert_eq!(config.promotional_unit_price.cents(), 500);
        assert_eq!(config.promotional_keywords.len(), 3);
    }
}
