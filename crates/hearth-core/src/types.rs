//! # Domain Types
//!
//! Core domain types used throughout the Hearth storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │──►│  product_id     │──►│  id (UUID)      │       │
//! │  │  sku (business) │   │  unit_price     │   │  status         │       │
//! │  │  price_cents    │   │  weight_kg?     │   │  total_cents    │       │
//! │  │  weight_kg?     │   │  quantity       │   │  provider       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ DestinationZone │   │ DeliveryMethod  │   │ PaymentProvider │       │
//! │  │  Domestic       │   │  Pickup         │   │  PayPal         │       │
//! │  │  Neighboring    │   │  Ship { zone }  │   │  Stripe         │       │
//! │  │  NorthAmerica   │   └─────────────────┘   └─────────────────┘       │
//! │  │  OtherIntl      │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::promotion::PromotionRule;
use crate::weight::Weight;

// =============================================================================
// Product
// =============================================================================

/// A handcrafted item in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown in the catalog and on the order.
    pub name: String,

    pub description: Option<String>,

    /// Catalog category ("toys", "ceramics", ...). Promotional keywords are
    /// matched against it as well as the name.
    pub category: Option<String>,

    /// Price in cents.
    pub price_cents: i64,

    /// Shipping weight in kilograms. Unknown weights fall back to
    /// [`crate::FALLBACK_LINE_WEIGHT_GRAMS`] at pricing time.
    pub weight_kg: Option<f64>,

    /// Whether product is listed (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product in the shopper's cart.
///
/// ## Snapshot Pattern
/// Price, name and weight are frozen when the line is created, so the cart
/// keeps showing what the shopper saw even if the catalog changes.
///
/// ## Raw Input
/// Fields mirror what the browser sends. A line may carry a negative price,
/// a zero quantity or a NaN weight; [`crate::pricing`] clamps those instead
/// of rejecting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub product_id: String,

    #[serde(default)]
    pub sku: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: Option<String>,

    /// Unit price in cents at time of adding (frozen).
    pub unit_price: Money,

    /// Unit weight in kilograms, if the catalog knows it.
    #[serde(default)]
    pub weight_kg: Option<f64>,

    pub quantity: i64,
}

impl CartLine {
    /// Creates a cart line from a catalog product.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            unit_price: product.price(),
            weight_kg: product.weight_kg,
            quantity,
        }
    }
}

// =============================================================================
// Destination Zone
// =============================================================================

/// Coarse destination grouping used to pick a shipping-rate bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DestinationZone {
    Domestic,
    NeighboringCountry,
    NorthAmerica,
    OtherInternational,
}

impl DestinationZone {
    /// Every zone, in the order they appear in configuration files.
    pub const ALL: [DestinationZone; 4] = [
        DestinationZone::Domestic,
        DestinationZone::NeighboringCountry,
        DestinationZone::NorthAmerica,
        DestinationZone::OtherInternational,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            DestinationZone::Domestic => "domestic",
            DestinationZone::NeighboringCountry => "neighboring_country",
            DestinationZone::NorthAmerica => "north_america",
            DestinationZone::OtherInternational => "other_international",
        }
    }
}

impl fmt::Display for DestinationZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DestinationZone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "domestic" => Ok(DestinationZone::Domestic),
            "neighboring_country" | "neighboring" => Ok(DestinationZone::NeighboringCountry),
            "north_america" => Ok(DestinationZone::NorthAmerica),
            "other_international" | "international" => Ok(DestinationZone::OtherInternational),
            other => Err(ValidationError::InvalidFormat {
                field: "zone".to_string(),
                reason: format!(
                    "unknown zone '{}'. Valid options: domestic, neighboring_country, north_america, other_international",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Delivery Method
// =============================================================================

/// How the order leaves the workshop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "method", rename_all = "snake_case")]
#[ts(export)]
pub enum DeliveryMethod {
    /// Customer collects in person; never pays shipping.
    Pickup,
    /// Parcel shipped to a destination zone.
    Ship { zone: DestinationZone },
}

impl DeliveryMethod {
    #[inline]
    pub const fn is_pickup(&self) -> bool {
        matches!(self, DeliveryMethod::Pickup)
    }

    #[inline]
    pub const fn zone(&self) -> Option<DestinationZone> {
        match self {
            DeliveryMethod::Pickup => None,
            DeliveryMethod::Ship { zone } => Some(*zone),
        }
    }
}

// =============================================================================
// Order Totals
// =============================================================================

/// Derived totals for a cart and delivery method.
///
/// Recomputed on every cart or destination change; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub grand_total: Money,
    /// Sum of line weights after the per-line fallback.
    pub total_weight: Weight,
    /// The promotion rule that zeroed shipping, if any.
    pub shipping_waiver: Option<PromotionRule>,
}

impl OrderTotals {
    /// All-zero totals (empty cart).
    pub const fn zero() -> Self {
        OrderTotals {
            subtotal: Money::zero(),
            shipping_cost: Money::zero(),
            grand_total: Money::zero(),
            total_weight: Weight::zero(),
            shipping_waiver: None,
        }
    }
}

// =============================================================================
// Payment Provider
// =============================================================================

/// The two external payment processors the storefront redirects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentProvider {
    PayPal,
    Stripe,
}

impl fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentProvider::PayPal => f.write_str("paypal"),
            PaymentProvider::Stripe => f.write_str("stripe"),
        }
    }
}

impl FromStr for PaymentProvider {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paypal" | "pay_pal" | "pay-pal" => Ok(PaymentProvider::PayPal),
            "stripe" => Ok(PaymentProvider::Stripe),
            other => Err(ValidationError::InvalidFormat {
                field: "payment provider".to_string(),
                reason: format!("unknown provider '{}'. Valid options: paypal, stripe", other),
            }),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// Order lifecycle.
///
/// ```text
/// Pending ──(provider confirms)──► Paid
///    │
///    └──(shopper abandons)──────► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrderStatus {
    /// Redirected to the provider, awaiting confirmation.
    #[default]
    Pending,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placed order. Totals are frozen at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    /// Cart session the order was placed from.
    pub session_id: String,
    pub status: OrderStatus,
    pub pickup: bool,
    pub zone: Option<DestinationZone>,
    /// ISO country code as entered at checkout.
    pub country_code: Option<String>,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    pub total_weight_grams: i64,
    pub shipping_waiver: Option<PromotionRule>,
    pub payment_provider: PaymentProvider,
    /// Provider transaction / session id once paid.
    pub payment_reference: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Reconstructs the delivery method recorded on the order.
    pub fn delivery(&self) -> DeliveryMethod {
        match (self.pickup, self.zone) {
            (false, Some(zone)) => DeliveryMethod::Ship { zone },
            _ => DeliveryMethod::Pickup,
        }
    }

    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in an order (snapshot of the cart line).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub sku_snapshot: String,
    pub name_snapshot: String,
    pub unit_price_cents: i64,
    pub weight_kg: Option<f64>,
    pub quantity: i64,
    pub line_total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
