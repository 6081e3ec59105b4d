//! # hearth-core: Pure Business Logic for the Hearth Storefront
//!
//! Hearth sells handcrafted goods online. This crate holds everything that
//! decides what an order costs, as pure functions with no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Hearth Storefront Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Browser display (TypeScript)                    │   │
//! │  │      Catalog ──► Cart ──► Destination ──► Pay with ...          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON (ts-rs bindings)                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              hearth-storefront (CartSession, Checkout)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ hearth-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌──────────────┐     │   │
//! │  │   │  money   │ │ shipping │ │ promotion │ │   pricing    │     │   │
//! │  │   │  weight  │ │ RateTable│ │   rules   │ │ OrderTotals  │     │   │
//! │  │   └──────────┘ └──────────┘ └───────────┘ └──────────────┘     │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌───────────┐                      │   │
//! │  │   │   cart   │ │ payment  │ │validation │                      │   │
//! │  │   └──────────┘ └──────────┘ └───────────┘                      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             hearth-db (SQLite catalog, carts, orders)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, CartLine, DeliveryMethod, Order, ...)
//! - [`money`] / [`weight`] - Integer cents and integer grams
//! - [`shipping`] - Zone map and weight-bracket rate table
//! - [`promotion`] - Ordered shipping-waiver rules
//! - [`pricing`] - The order total calculator
//! - [`cart`] - Cart aggregate with quantity limits
//! - [`payment`] - PayPal / Stripe redirect builders
//! - [`config`] - Pricing configuration parsing
//! - [`validation`] - Form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use hearth_core::{calculate_totals, CartLine, DeliveryMethod, Money, PricingConfig};
//!
//! let config = PricingConfig::default();
//! let cart = vec![CartLine {
//!     product_id: "kit".into(),
//!     sku: "PINE-CAR-KIT".into(),
//!     name: "Pine Car Kit".into(),
//!     category: Some("toys".into()),
//!     unit_price: Money::from_cents(500),
//!     weight_kg: Some(0.3),
//!     quantity: 1,
//! }];
//!
//! let delivery = config.delivery_to(Some("DE"), false);
//! let totals = calculate_totals(&cart, delivery, &config);
//!
//! // Promotional item: ships free anywhere
//! assert_eq!(totals.shipping_cost, Money::zero());
//! assert_eq!(totals.grand_total.cents(), 500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod config;
pub mod error;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod promotion;
pub mod shipping;
pub mod types;
pub mod validation;
pub mod weight;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use config::{PricingConfig, ShippingConfig};
pub use error::{ConfigError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payment::{PaymentRedirect, PaymentRequest, PaymentSettings};
pub use pricing::calculate_totals;
pub use promotion::{PromotionConfig, PromotionRule};
pub use shipping::{RateBracket, RateTable, ZoneMap};
pub use types::*;
pub use weight::Weight;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Weight assumed for one unit of a line whose catalog weight is unknown.
///
/// Applied per line before multiplying by quantity, so three unknown mugs
/// weigh 1.5 kg, not 0.5 kg.
pub const FALLBACK_LINE_WEIGHT_GRAMS: i64 = 500;

/// Maximum distinct lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Catches typos like 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Heaviest catalog weight accepted by validation, in kilograms.
pub const MAX_PARCEL_WEIGHT_KG: i64 = 100;
