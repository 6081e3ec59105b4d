//! # Cart Repository
//!
//! Per-session cart persistence.
//!
//! A cart is saved whole: `save` replaces every line for the session inside
//! one transaction, so a reader never sees half of an edit.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use hearth_core::{CartLine, Money};

/// Row shape of `cart_lines`.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    product_id: String,
    sku: String,
    name: String,
    category: Option<String>,
    unit_price_cents: i64,
    weight_kg: Option<f64>,
    quantity: i64,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        CartLine {
            product_id: row.product_id,
            sku: row.sku,
            name: row.name,
            category: row.category,
            unit_price: Money::from_cents(row.unit_price_cents),
            weight_kg: row.weight_kg,
            quantity: row.quantity,
        }
    }
}

/// Repository for cart lines.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Loads a session's lines in the order they were added. Unknown
    /// sessions have an empty cart.
    pub async fn load(&self, session_id: &str) -> DbResult<Vec<CartLine>> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r#"
            SELECT product_id, sku, name, category, unit_price_cents, weight_kg, quantity
            FROM cart_lines
            WHERE session_id = ?1
            ORDER BY position
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    /// Replaces the session's lines.
    ///
    /// Lines are stored as given. A later line with the same product id
    /// overwrites an earlier one.
    pub async fn save(&self, session_id: &str, lines: &[CartLine]) -> DbResult<()> {
        debug!(session_id = %session_id, lines = lines.len(), "Saving cart");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cart_lines WHERE session_id = ?1")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        for (position, line) in lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO cart_lines (
                    session_id, position, product_id, sku, name, category,
                    unit_price_cents, weight_kg, quantity, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(session_id)
            .bind(position as i64)
            .bind(&line.product_id)
            .bind(&line.sku)
            .bind(&line.name)
            .bind(&line.category)
            .bind(line.unit_price.cents())
            // NaN is not storable as REAL; it reads back as unknown weight,
            // which prices the same
            .bind(line.weight_kg.filter(|kg| kg.is_finite()))
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Deletes every line for the session.
    pub async fn clear(&self, session_id: &str) -> DbResult<()> {
        debug!(session_id = %session_id, "Clearing cart");

        sqlx::query("DELETE FROM cart_lines WHERE session_id = ?1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
