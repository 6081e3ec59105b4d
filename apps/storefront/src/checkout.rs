//! # Checkout
//!
//! Turns a cart session into a pending order and a payment redirect.
//!
//! ## Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout::place                                 │
//! │                                                                         │
//! │  1. Cart empty? ───────────────────────────────► Err(EmptyCart)        │
//! │  2. Shipping? validate the country code                                │
//! │  3. Country ──► DeliveryMethod (zone map)                              │
//! │  4. calculate_totals(cart, delivery)                                   │
//! │  5. Snapshot lines into OrderItems (clamped values)                    │
//! │  6. build_redirect(provider, grand total) ──────► Err(PaymentError)    │
//! │  7. Insert order + items (one transaction)                             │
//! │  8. Clear the cart                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The redirect is built before anything is written, so a misconfigured
//! provider never leaves an orphan order behind.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use hearth_core::payment::{build_redirect, PaymentRedirect, PaymentRequest};
use hearth_core::pricing::{effective_line_total, effective_quantity, effective_unit_price};
use hearth_core::validation::validate_country_code;
use hearth_core::{
    CartLine, CoreError, Order, OrderItem, OrderStatus, OrderTotals, PaymentProvider,
};
use hearth_db::{generate_order_id, OrderRepository};

use crate::config::StoreConfig;
use crate::error::AppResult;
use crate::session::CartSession;

/// What the shopper submitted on the checkout form.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// ISO country code. Ignored for pickup.
    pub country_code: Option<String>,
    pub pickup: bool,
    pub provider: PaymentProvider,
}

/// A placed order and where to send the shopper next.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub totals: OrderTotals,
    pub redirect: PaymentRedirect,
}

/// Places orders against a store configuration.
pub struct Checkout<'a> {
    config: &'a StoreConfig,
    orders: OrderRepository,
}

impl<'a> Checkout<'a> {
    pub fn new(config: &'a StoreConfig, orders: OrderRepository) -> Self {
        Checkout { config, orders }
    }

    /// Places the order for everything in `session` and empties it.
    pub async fn place(
        &self,
        session: &mut CartSession,
        request: &CheckoutRequest,
    ) -> AppResult<CheckoutReceipt> {
        if session.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let country = if request.pickup {
            None
        } else {
            Some(validate_country_code(
                request.country_code.as_deref().unwrap_or_default(),
            )?)
        };

        let pricing = &self.config.pricing;
        let delivery = pricing.delivery_to(country.as_deref(), request.pickup);
        let totals = session.totals(delivery, pricing);

        let order_id = generate_order_id();
        let now = Utc::now();

        let items: Vec<OrderItem> = session
            .lines()
            .iter()
            .map(|line| order_item(&order_id, line, now))
            .collect();

        let order = Order {
            id: order_id.clone(),
            session_id: session.session_id().to_string(),
            status: OrderStatus::Pending,
            pickup: delivery.is_pickup(),
            zone: delivery.zone(),
            country_code: country,
            subtotal_cents: totals.subtotal.cents(),
            shipping_cents: totals.shipping_cost.cents(),
            total_cents: totals.grand_total.cents(),
            total_weight_grams: totals.total_weight.grams(),
            shipping_waiver: totals.shipping_waiver,
            payment_provider: request.provider,
            payment_reference: None,
            created_at: now,
            updated_at: now,
            paid_at: None,
        };

        let description = format!("{} order {}", self.config.store.name, short_id(&order_id));
        let redirect = build_redirect(
            request.provider,
            &PaymentRequest {
                order_id: &order_id,
                description: &description,
                amount: totals.grand_total,
            },
            &self.config.payments,
        )?;

        self.orders.insert(&order, &items).await?;
        session.clear().await?;

        info!(
            order_id = %order.id,
            total = %totals.grand_total,
            shipping = %totals.shipping_cost,
            items = items.len(),
            provider = %request.provider,
            "Order placed"
        );

        Ok(CheckoutReceipt {
            order,
            items,
            totals,
            redirect,
        })
    }
}

/// Snapshots a cart line with the same clamping the calculator applied.
fn order_item(order_id: &str, line: &CartLine, now: chrono::DateTime<Utc>) -> OrderItem {
    OrderItem {
        id: Uuid::new_v4().to_string(),
        order_id: order_id.to_string(),
        product_id: line.product_id.clone(),
        sku_snapshot: line.sku.clone(),
        name_snapshot: line.name.clone(),
        unit_price_cents: effective_unit_price(line).cents(),
        weight_kg: line.weight_kg.filter(|kg| kg.is_finite()),
        quantity: effective_quantity(line),
        line_total_cents: effective_line_total(line).cents(),
        created_at: now,
    }
}

/// First group of a UUID, for display.
fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

// =============================================================================
// Unit Tests
// =============================================================================
