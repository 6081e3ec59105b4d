//! # Order Repository
//!
//! Database operations for placed orders and their line snapshots.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. PLACE                                                               │
//! │     └── insert(order, items) → Order { status: Pending }                │
//! │         (order row + every item row in ONE transaction)                 │
//! │                                                                         │
//! │  2a. PROVIDER CONFIRMS                                                  │
//! │     └── mark_paid(id, reference) → Order { status: Paid }               │
//! │                                                                         │
//! │  2b. SHOPPER ABANDONS                                                   │
//! │     └── cancel(id) → Order { status: Cancelled }                        │
//! │                                                                         │
//! │  Both transitions require status = pending; anything else is            │
//! │  DbError::InvalidStatus.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use hearth_core::{Order, OrderItem, OrderStatus};

const ORDER_COLUMNS: &str = r#"
    id, session_id, status, pickup, zone, country_code,
    subtotal_cents, shipping_cents, total_cents, total_weight_grams,
    shipping_waiver, payment_provider, payment_reference,
    created_at, updated_at, paid_at
"#;

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order and its items atomically.
    pub async fn insert(&self, order: &Order, items: &[OrderItem]) -> DbResult<()> {
        debug!(
            id = %order.id,
            total_cents = order.total_cents,
            items = items.len(),
            "Inserting order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, session_id, status, pickup, zone, country_code,
                subtotal_cents, shipping_cents, total_cents, total_weight_grams,
                shipping_waiver, payment_provider, payment_reference,
                created_at, updated_at, paid_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12, ?13,
                ?14, ?15, ?16
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.session_id)
        .bind(order.status)
        .bind(order.pickup)
        .bind(order.zone)
        .bind(&order.country_code)
        .bind(order.subtotal_cents)
        .bind(order.shipping_cents)
        .bind(order.total_cents)
        .bind(order.total_weight_grams)
        .bind(order.shipping_waiver)
        .bind(order.payment_provider)
        .bind(&order.payment_reference)
        .bind(order.created_at)
        .bind(order.updated_at)
        .bind(order.paid_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id, sku_snapshot, name_snapshot,
                    unit_price_cents, weight_kg, quantity, line_total_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(&item.sku_snapshot)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.weight_kg.filter(|kg| kg.is_finite()))
            .bind(item.quantity)
            .bind(item.line_total_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(id = %order.id, "Order placed");
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Items of an order, in the order they were in the cart.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT
                id, order_id, product_id, sku_snapshot, name_snapshot,
                unit_price_cents, weight_kg, quantity, line_total_cents, created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Most recent orders first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Records the provider's confirmation.
    pub async fn mark_paid(&self, id: &str, payment_reference: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = 'paid',
                payment_reference = ?2,
                paid_at = ?3,
                updated_at = ?3
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(payment_reference)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.transition_error(id).await);
        }

        info!(id = %id, reference = %payment_reference, "Order paid");
        Ok(())
    }

    pub async fn cancel(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = 'cancelled',
                updated_at = ?2
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.transition_error(id).await);
        }

        info!(id = %id, "Order cancelled");
        Ok(())
    }

    /// Explains why a pending-only update touched no rows.
    async fn transition_error(&self, id: &str) -> DbError {
        let status: Result<Option<OrderStatus>, sqlx::Error> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;

        match status {
            Ok(None) => DbError::not_found("Order", id),
            Ok(Some(status)) => DbError::InvalidStatus {
                entity: "Order".to_string(),
                id: id.to_string(),
                status: status.to_string(),
            },
            Err(err) => err.into(),
        }
    }
}

/// Generates a new order or order item ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
