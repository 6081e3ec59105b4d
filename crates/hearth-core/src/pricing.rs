//! # Order Total Calculator
//!
//! Turns a cart and a delivery method into [`OrderTotals`].
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  calculate_totals(lines, delivery, config)                              │
//! │                                                                         │
//! │  CartLine[] ──► clamp ──► subtotal Σ price×qty                          │
//! │                   │                                                     │
//! │                   └────► weight Σ (kg or 0.5 kg fallback)×qty           │
//! │                                                                         │
//! │  PromotionRule::first_match ── Some(rule) ──► shipping = 0              │
//! │          │ None                                                         │
//! │          ▼                                                              │
//! │  RateTable::lookup(zone, weight) ──► shipping                           │
//! │                                                                         │
//! │  grand total = subtotal + shipping                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Clamping
//! The calculator never fails. It runs on every keystroke of the cart page,
//! so malformed lines are normalised instead of rejected:
//!
//! | Input                        | Treated as                      |
//! |------------------------------|---------------------------------|
//! | negative unit price          | 0                               |
//! | quantity < 1                 | 1                               |
//! | missing / NaN / ∞ weight     | 0.5 kg (per line, before × qty) |
//! | negative weight              | 0                               |
//!
//! Rejecting bad input is the checkout form's job (see [`crate::validation`]).

use tracing::trace;

use crate::config::PricingConfig;
use crate::money::Money;
use crate::promotion::{PromotionInput, PromotionRule};
use crate::types::{CartLine, DeliveryMethod, OrderTotals};
use crate::weight::Weight;
use crate::FALLBACK_LINE_WEIGHT_GRAMS;

// =============================================================================
// Line Normalisation
// =============================================================================

/// Unit price with negatives clamped to zero.
#[inline]
pub fn effective_unit_price(line: &CartLine) -> Money {
    line.unit_price.clamp_non_negative()
}

/// Quantity with anything below one raised to one.
#[inline]
pub fn effective_quantity(line: &CartLine) -> i64 {
    line.quantity.max(1)
}

/// Unit weight after the fallback and clamping rules.
pub fn effective_unit_weight(line: &CartLine) -> Weight {
    match line.weight_kg.and_then(Weight::from_kg) {
        None => Weight::from_grams(FALLBACK_LINE_WEIGHT_GRAMS),
        Some(weight) if weight.is_negative() => Weight::zero(),
        Some(weight) => weight,
    }
}

/// Subtotal of a single line after clamping.
#[inline]
pub fn effective_line_total(line: &CartLine) -> Money {
    effective_unit_price(line).multiply_quantity(effective_quantity(line))
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes subtotal, shipping and grand total for a cart.
///
/// Pure and deterministic: no I/O, no clock, no hidden state. An empty cart
/// yields all-zero totals regardless of delivery method.
///
/// ## Example
/// ```rust
/// use hearth_core::pricing::calculate_totals;
/// use hearth_core::{CartLine, DeliveryMethod, DestinationZone, Money, PricingConfig};
///
/// let lines = vec![CartLine {
///     product_id: "bowl".into(),
///     sku: "WB-01".into(),
///     name: "Walnut Bowl".into(),
///     category: None,
///     unit_price: Money::from_cents(3500),
///     weight_kg: Some(0.8),
///     quantity: 1,
/// }];
/// let delivery = DeliveryMethod::Ship { zone: DestinationZone::Domestic };
///
/// let totals = calculate_totals(&lines, delivery, &PricingConfig::default());
/// assert_eq!(totals.shipping_cost.cents(), 850);
/// assert_eq!(totals.grand_total.cents(), 4350);
/// ```
pub fn calculate_totals(
    lines: &[CartLine],
    delivery: DeliveryMethod,
    config: &PricingConfig,
) -> OrderTotals {
    if lines.is_empty() {
        return OrderTotals::zero();
    }

    let mut subtotal = Money::zero();
    let mut total_weight = Weight::zero();
    for line in lines {
        let qty = effective_quantity(line);
        subtotal = subtotal.saturating_add(effective_line_total(line));
        total_weight = total_weight.saturating_add(effective_unit_weight(line).multiply_quantity(qty));
    }

    let input = PromotionInput {
        lines,
        subtotal,
        delivery,
    };
    let shipping_waiver = PromotionRule::first_match(&input, &config.promotions);

    let shipping_cost = match (shipping_waiver, delivery) {
        (Some(_), _) | (None, DeliveryMethod::Pickup) => Money::zero(),
        (None, DeliveryMethod::Ship { zone }) => config.shipping.rates.lookup(zone, total_weight),
    };

    let totals = OrderTotals {
        subtotal,
        shipping_cost,
        grand_total: subtotal.saturating_add(shipping_cost),
        total_weight,
        shipping_waiver,
    };

    trace!(
        lines = lines.len(),
        subtotal = %totals.subtotal,
        shipping = %totals.shipping_cost,
        weight = %totals.total_weight,
        waiver = ?totals.shipping_waiver,
        "Computed order totals"
    );

    totals
}

impl PricingConfig {
    /// Shorthand for [`calculate_totals`] with this configuration.
    #[inline]
    pub fn quote(&self, lines: &[CartLine], delivery: DeliveryMethod) -> OrderTotals {
        calculate_totals(lines, delivery, self)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DestinationZone;

    fn line(name: &str, cents: i64, weight_kg: Option<f64>, quantity: i64) -> CartLine {
        CartLine {
            product_id: name.to_lowercase().replace(' ', "-"),
            sku: String::new(),
            name: name.to_string(),
            category: None,
            unit_price: Money::from_cents(cents),
            weight_kg,
            quantity,
        }
    }

    fn ship(zone: DestinationZone) -> DeliveryMethod {
        DeliveryMethod::Ship { zone }
    }

    #[test]
    fn test_domestic_parcel_under_one_kg() {
        let config = PricingConfig::default();
        let cart = vec![line("Walnut Bowl", 3500, Some(0.8), 1)];

        let totals = calculate_totals(&cart, ship(DestinationZone::Domestic), &config);

        assert_eq!(totals.subtotal.cents(), 3500);
        assert_eq!(totals.total_weight.grams(), 800);
        assert_eq!(totals.shipping_cost.cents(), 850);
        assert_eq!(totals.grand_total.cents(), 4350);
        assert_eq!(totals.shipping_waiver, None);
    }

    #[test]
    fn test_pickup_never_pays_shipping() {
        let config = PricingConfig::default();
        let cart = vec![line("Walnut Bowl", 3500, Some(0.8), 1)];

        let totals = calculate_totals(&cart, DeliveryMethod::Pickup, &config);

        assert_eq!(totals.shipping_cost, Money::zero());
        assert_eq!(totals.grand_total.cents(), 3500);
        assert_eq!(totals.shipping_waiver, Some(PromotionRule::Pickup));
    }

    #[test]
    fn test_threshold_waives_international_shipping() {
        let config = PricingConfig::default();
        let cart = vec![line("Cherry Dining Table", 120_000, Some(40.0), 1)];

        let totals = calculate_totals(&cart, ship(DestinationZone::OtherInternational), &config);

        assert_eq!(totals.shipping_cost, Money::zero());
        assert_eq!(totals.grand_total.cents(), 120_000);
        assert_eq!(totals.shipping_waiver, Some(PromotionRule::FreeShippingThreshold));
    }

    #[test]
    fn test_promotional_sku_waives_shipping() {
        let config = PricingConfig::default();
        let cart = vec![line("pine car", 500, Some(0.3), 1)];

        let totals = calculate_totals(&cart, ship(DestinationZone::Domestic), &config);

        assert_eq!(totals.shipping_cost, Money::zero());
        assert_eq!(totals.grand_total.cents(), 500);
        assert_eq!(totals.shipping_waiver, Some(PromotionRule::PromotionalSku));
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let config = PricingConfig::default();
        for delivery in [DeliveryMethod::Pickup, ship(DestinationZone::OtherInternational)] {
            assert_eq!(calculate_totals(&[], delivery, &config), OrderTotals::zero());
        }
    }

    #[test]
    fn test_fallback_weight_applies_per_line() {
        let config = PricingConfig::default();
        // Two unknown-weight lines: 0.5 kg each, times quantity
        let cart = vec![
            line("Felt Coaster", 1200, None, 3),
            line("Linen Napkin", 900, Some(f64::NAN), 2),
        ];

        let totals = calculate_totals(&cart, ship(DestinationZone::Domestic), &config);

        assert_eq!(totals.total_weight.grams(), 2500);
        // 2.5 kg lands in the 5 kg bracket
        assert_eq!(totals.shipping_cost.cents(), 1800);
    }

    #[test]
    fn test_bad_lines_are_clamped() {
        let config = PricingConfig::default();
        let cart = vec![
            line("Refund Hack", -10_000, Some(-2.0), 0),
            line("Spoon", 1500, Some(0.2), -4),
        ];

        let totals = calculate_totals(&cart, ship(DestinationZone::Domestic), &config);

        assert_eq!(totals.subtotal.cents(), 1500);
        assert_eq!(totals.total_weight.grams(), 200);
        assert_eq!(totals.shipping_cost.cents(), 850);
        assert_eq!(totals.grand_total.cents(), 2350);
    }

    #[test]
    fn test_overweight_parcel_uses_top_bracket() {
        let config = PricingConfig::default();
        let cart = vec![line("Oak Bench", 45_000, Some(55.0), 1)];

        let totals = calculate_totals(&cart, ship(DestinationZone::NorthAmerica), &config);

        assert_eq!(totals.shipping_cost.cents(), 9000);
    }

    #[test]
    fn test_bracket_bound_is_inclusive() {
        let config = PricingConfig::default();
        // 0.25 + 0.75 = exactly 1 kg in grams, no float drift
        let cart = vec![
            line("Whistle", 800, Some(0.25), 1),
            line("Trivet", 1100, Some(0.75), 1),
        ];

        let totals = calculate_totals(&cart, ship(DestinationZone::Domestic), &config);

        assert_eq!(totals.total_weight.grams(), 1000);
        assert_eq!(totals.shipping_cost.cents(), 850);
    }

    #[test]
    fn test_quote_matches_free_function() {
        let config = PricingConfig::default();
        let cart = vec![line("Walnut Bowl", 3500, Some(0.8), 2)];
        let delivery = ship(DestinationZone::NeighboringCountry);

        assert_eq!(
            config.quote(&cart, delivery),
            calculate_totals(&cart, delivery, &config)
        );
    }
}

// =============================================================================
// Property Tests
// =============================================================================
