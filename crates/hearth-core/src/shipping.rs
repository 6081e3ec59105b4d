//! # Shipping Module
//!
//! Destination-zone inference and the weight-bracket rate table.
//!
//! ## Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Country "US" ──► ZoneMap ──► NeighboringCountry                        │
//! │                                                                         │
//! │  RateTable[NeighboringCountry]   (ascending bounds, closed intervals)   │
//! │    ≤ 1 kg   $12.00                                                      │
//! │    ≤ 2 kg   $18.00   ◄── 1.4 kg parcel: first bound ≥ weight wins      │
//! │    ≤ 5 kg   $26.00                                                      │
//! │    ≤ 10 kg  $40.00                                                      │
//! │    ≤ 30 kg  $65.00   ◄── 42 kg parcel: past every bound, top rate      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The table is built once, validated at construction, and immutable for the
//! rest of the session. A linear scan over a handful of brackets is all the
//! lookup needs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::money::Money;
use crate::types::DestinationZone;
use crate::weight::Weight;

// =============================================================================
// Zone Map
// =============================================================================

/// Maps ISO 3166-1 alpha-2 country codes onto destination zones.
///
/// Anything not listed is [`DestinationZone::OtherInternational`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMap {
    /// The workshop's own country.
    #[serde(default = "default_home_country")]
    pub home_country: String,

    #[serde(default = "default_neighboring_countries")]
    pub neighboring_countries: Vec<String>,

    #[serde(default = "default_north_america")]
    pub north_america: Vec<String>,
}

fn default_home_country() -> String {
    "CA".to_string()
}

fn default_neighboring_countries() -> Vec<String> {
    vec!["US".to_string()]
}

fn default_north_america() -> Vec<String> {
    [
        "MX", "GL", "PM", "BM", "BZ", "GT", "SV", "HN", "NI", "CR", "PA", "CU", "JM", "HT", "DO",
        "PR", "BS",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

impl Default for ZoneMap {
    fn default() -> Self {
        ZoneMap {
            home_country: default_home_country(),
            neighboring_countries: default_neighboring_countries(),
            north_america: default_north_america(),
        }
    }
}

impl ZoneMap {
    /// Infers the destination zone for a country code.
    ///
    /// Codes are trimmed and compared case-insensitively. The home country
    /// wins over the other lists if a code is listed twice.
    ///
    /// ## Example
    /// ```rust
    /// use hearth_core::shipping::ZoneMap;
    /// use hearth_core::DestinationZone;
    ///
    /// let zones = ZoneMap::default();
    /// assert_eq!(zones.zone_for("ca"), DestinationZone::Domestic);
    /// assert_eq!(zones.zone_for("US"), DestinationZone::NeighboringCountry);
    /// assert_eq!(zones.zone_for("MX"), DestinationZone::NorthAmerica);
    /// assert_eq!(zones.zone_for("JP"), DestinationZone::OtherInternational);
    /// ```
    pub fn zone_for(&self, country_code: &str) -> DestinationZone {
        let code = country_code.trim();
        let matches = |candidate: &String| candidate.eq_ignore_ascii_case(code);

        if matches(&self.home_country) {
            DestinationZone::Domestic
        } else if self.neighboring_countries.iter().any(matches) {
            DestinationZone::NeighboringCountry
        } else if self.north_america.iter().any(matches) {
            DestinationZone::NorthAmerica
        } else {
            DestinationZone::OtherInternational
        }
    }

    /// Checks that every listed code looks like a two-letter country code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = std::iter::once(&self.home_country)
            .chain(self.neighboring_countries.iter())
            .chain(self.north_america.iter());

        for code in all {
            let code = code.trim();
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigError::InvalidValue {
                    field: "shipping.zones".to_string(),
                    reason: format!("'{}' is not a two-letter country code", code),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Rate Table
// =============================================================================

/// One weight bracket: parcels up to and including `max_weight` cost `price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBracket {
    #[serde(rename = "max_weight_kg", with = "crate::weight::kilograms")]
    pub max_weight: Weight,

    #[serde(with = "crate::money::decimal")]
    pub price: Money,
}

impl RateBracket {
    pub const fn new(max_weight: Weight, price: Money) -> Self {
        RateBracket { max_weight, price }
    }
}

/// Shipping prices per destination zone, bracketed by weight.
///
/// ## Invariants (enforced by [`RateTable::new`])
/// - Every [`DestinationZone`] has at least one bracket
/// - Bounds are positive and prices non-negative
/// - Brackets are stored in ascending bound order
///
/// In a config file the table is a map of zone name to bracket list:
/// ```toml
/// [shipping.rates]
/// domestic = [
///   { max_weight_kg = 1.0, price = "8.50" },
///   { max_weight_kg = 2.0, price = "12.00" },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<RateBracket>>",
    into = "BTreeMap<String, Vec<RateBracket>>"
)]
pub struct RateTable {
    zones: BTreeMap<DestinationZone, Vec<RateBracket>>,
}

impl RateTable {
    /// Builds a table, sorting each zone's brackets by bound.
    ///
    /// ## Errors
    /// - [`ConfigError::MissingZoneRates`] if a zone has no brackets
    /// - [`ConfigError::InvalidBracket`] for a non-positive bound, a negative
    ///   price, or two brackets sharing a bound
    pub fn new(mut zones: BTreeMap<DestinationZone, Vec<RateBracket>>) -> Result<Self, ConfigError> {
        for zone in DestinationZone::ALL {
            let brackets = zones
                .get_mut(&zone)
                .filter(|b| !b.is_empty())
                .ok_or_else(|| ConfigError::MissingZoneRates {
                    zone: zone.to_string(),
                })?;

            brackets.sort_by_key(|b| b.max_weight);

            for bracket in brackets.iter() {
                if bracket.max_weight.grams() <= 0 {
                    return Err(ConfigError::InvalidBracket {
                        zone: zone.to_string(),
                        reason: format!("weight bound {} must be positive", bracket.max_weight),
                    });
                }
                if bracket.price.is_negative() {
                    return Err(ConfigError::InvalidBracket {
                        zone: zone.to_string(),
                        reason: format!("price {} must not be negative", bracket.price),
                    });
                }
            }

            if brackets.windows(2).any(|w| w[0].max_weight == w[1].max_weight) {
                return Err(ConfigError::InvalidBracket {
                    zone: zone.to_string(),
                    reason: "two brackets share the same weight bound".to_string(),
                });
            }
        }

        Ok(RateTable { zones })
    }

    /// Brackets for a zone, ascending by bound.
    pub fn brackets(&self, zone: DestinationZone) -> &[RateBracket] {
        self.zones.get(&zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Price for shipping `weight` to `zone`.
    ///
    /// Picks the smallest bound ≥ weight. A parcel heavier than every bound
    /// is charged the highest-bound rate: the table is a ceiling, not a
    /// failure.
    ///
    /// ## Example
    /// ```rust
    /// use hearth_core::shipping::RateTable;
    /// use hearth_core::{DestinationZone, Weight};
    ///
    /// let table = RateTable::default();
    /// let price = table.lookup(DestinationZone::Domestic, Weight::from_grams(800));
    /// assert_eq!(price.cents(), 850);
    /// ```
    pub fn lookup(&self, zone: DestinationZone, weight: Weight) -> Money {
        let brackets = self.brackets(zone);
        brackets
            .iter()
            .find(|bracket| weight <= bracket.max_weight)
            .or_else(|| brackets.last())
            .map(|bracket| bracket.price)
            .unwrap_or_default()
    }
}

impl From<RateTable> for BTreeMap<DestinationZone, Vec<RateBracket>> {
    fn from(table: RateTable) -> Self {
        table.zones
    }
}

/// Config files key the table by zone name.
impl TryFrom<BTreeMap<String, Vec<RateBracket>>> for RateTable {
    type Error = ConfigError;

    fn try_from(raw: BTreeMap<String, Vec<RateBracket>>) -> Result<Self, Self::Error> {
        let zones = raw
            .into_iter()
            .map(|(name, brackets)| {
                let zone = name.parse::<DestinationZone>().map_err(|e| {
                    ConfigError::InvalidValue {
                        field: "shipping.rates".to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok((zone, brackets))
            })
            .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;

        RateTable::new(zones)
    }
}

impl From<RateTable> for BTreeMap<String, Vec<RateBracket>> {
    fn from(table: RateTable) -> Self {
        table
            .zones
            .into_iter()
            .map(|(zone, brackets)| (zone.to_string(), brackets))
            .collect()
    }
}

/// The workshop's published rates (kg bound, cents) per zone.
const DEFAULT_RATES: [(DestinationZone, [(i64, i64); 5]); 4] = [
    (
        DestinationZone::Domestic,
        [(1_000, 850), (2_000, 1_200), (5_000, 1_800), (10_000, 2_800), (30_000, 4_500)],
    ),
    (
        DestinationZone::NeighboringCountry,
        [(1_000, 1_200), (2_000, 1_800), (5_000, 2_600), (10_000, 4_000), (30_000, 6_500)],
    ),
    (
        DestinationZone::NorthAmerica,
        [(1_000, 1_800), (2_000, 2_600), (5_000, 3_800), (10_000, 5_800), (30_000, 9_000)],
    ),
    (
        DestinationZone::OtherInternational,
        [(1_000, 2_500), (2_000, 3_800), (5_000, 5_500), (10_000, 8_500), (30_000, 13_000)],
    ),
];

impl Default for RateTable {
    fn default() -> Self {
        let zones = DEFAULT_RATES
            .iter()
            .map(|(zone, brackets)| {
                let brackets = brackets
                    .iter()
                    .map(|&(grams, cents)| {
                        RateBracket::new(Weight::from_grams(grams), Money::from_cents(cents))
                    })
                    .collect();
                (*zone, brackets)
            })
            .collect();

        // Built directly: DEFAULT_RATES is already complete and ascending.
        RateTable { zones }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn grams(g: i64) -> Weight {
        Weight::from_grams(g)
    }

    #[test]
    fn test_default_table_is_valid() {
        let table = RateTable::default();
        let zones: BTreeMap<DestinationZone, Vec<RateBracket>> = table.clone().into();
        let rebuilt = RateTable::new(zones).unwrap();
        assert_eq!(rebuilt, table);
    }

    #[test]
    fn test_lookup_closed_interval() {
        let table = RateTable::default();
        let zone = DestinationZone::Domestic;

        assert_eq!(table.lookup(zone, grams(0)).cents(), 850);
        assert_eq!(table.lookup(zone, grams(800)).cents(), 850);
        // Exactly on the bound stays in the lower bracket
        assert_eq!(table.lookup(zone, grams(1_000)).cents(), 850);
        assert_eq!(table.lookup(zone, grams(1_001)).cents(), 1_200);
        assert_eq!(table.lookup(zone, grams(4_999)).cents(), 1_800);
    }

    #[test]
    fn test_lookup_over_every_bound_uses_top_rate() {
        let table = RateTable::default();
        assert_eq!(
            table.lookup(DestinationZone::OtherInternational, grams(75_000)).cents(),
            13_000
        );
    }

    #[test]
    fn test_new_sorts_brackets() {
        let mut zones: BTreeMap<DestinationZone, Vec<RateBracket>> = RateTable::default().into();
        zones.get_mut(&DestinationZone::Domestic).unwrap().reverse();

        let table = RateTable::new(zones).unwrap();
        let bounds: Vec<i64> = table
            .brackets(DestinationZone::Domestic)
            .iter()
            .map(|b| b.max_weight.grams())
            .collect();
        assert_eq!(bounds, vec![1_000, 2_000, 5_000, 10_000, 30_000]);
    }

    #[test]
    fn test_new_rejects_missing_zone() {
        let mut zones: BTreeMap<DestinationZone, Vec<RateBracket>> = RateTable::default().into();
        zones.remove(&DestinationZone::NorthAmerica);
        assert!(matches!(
            RateTable::new(zones),
            Err(ConfigError::MissingZoneRates { .. })
        ));
    }

    #[test]
    fn test_new_rejects_bad_brackets() {
        let mut zones: BTreeMap<DestinationZone, Vec<RateBracket>> = RateTable::default().into();
        zones.insert(
            DestinationZone::Domestic,
            vec![RateBracket::new(grams(0), Money::from_cents(500))],
        );
        assert!(RateTable::new(zones.clone()).is_err());

        zones.insert(
            DestinationZone::Domestic,
            vec![RateBracket::new(grams(1_000), Money::from_cents(-1))],
        );
        assert!(RateTable::new(zones.clone()).is_err());

        zones.insert(
            DestinationZone::Domestic,
            vec![
                RateBracket::new(grams(1_000), Money::from_cents(500)),
                RateBracket::new(grams(1_000), Money::from_cents(700)),
            ],
        );
        assert!(RateTable::new(zones).is_err());
    }

    #[test]
    fn test_zone_map_inference() {
        let zones = ZoneMap::default();
        assert_eq!(zones.zone_for(" ca "), DestinationZone::Domestic);
        assert_eq!(zones.zone_for("us"), DestinationZone::NeighboringCountry);
        assert_eq!(zones.zone_for("PR"), DestinationZone::NorthAmerica);
        assert_eq!(zones.zone_for("DE"), DestinationZone::OtherInternational);
        assert_eq!(zones.zone_for(""), DestinationZone::OtherInternational);
    }

    #[test]
    fn test_zone_map_validation() {
        assert!(ZoneMap::default().validate().is_ok());

        let zones = ZoneMap {
            home_country: "Canada".to_string(),
            ..ZoneMap::default()
        };
        assert!(zones.validate().is_err());
    }

    #[test]
    fn test_rates_from_toml() {
        let toml_str = r#"
            domestic = [
              { max_weight_kg = 2.0, price = "12.00" },
              { max_weight_kg = 1.0, price = "8.50" },
            ]
            neighboring_country = [{ max_weight_kg = 1.0, price = "12.00" }]
            north_america = [{ max_weight_kg = 1.0, price = "18.00" }]
            other_international = [{ max_weight_kg = 1.0, price = "25.00" }]
        "#;
        let table: RateTable = toml::from_str(toml_str).unwrap();
        assert_eq!(table.lookup(DestinationZone::Domestic, grams(1_500)).cents(), 1_200);
        assert_eq!(table.brackets(DestinationZone::Domestic)[0].price.cents(), 850);
    }

    #[test]
    fn test_rates_from_toml_rejects_unknown_zone() {
        let toml_str = r#"
            domestic = [{ max_weight_kg = 1.0, price = "8.50" }]
            neighboring_country = [{ max_weight_kg = 1.0, price = "12.00" }]
            north_america = [{ max_weight_kg = 1.0, price = "18.00" }]
            other_international = [{ max_weight_kg = 1.0, price = "25.00" }]
            moon = [{ max_weight_kg = 1.0, price = "999.00" }]
        "#;
        assert!(toml::from_str::<RateTable>(toml_str).is_err());
    }
}
