//! # Product Repository
//!
//! Catalog reads and writes.
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Search                                       │
//! │                                                                         │
//! │  Shopper types: "pine"                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LIKE '%pine%' over sku, name, category (active products only)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PINE-CAR-KIT | Pine Car Kit          | toys      ← MATCH               │
//! │  BOWL-WAL-12  | Walnut Bowl           | kitchen                         │
//! │  SPOON-PINE   | Carved Pine Spoon     | kitchen   ← MATCH               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ordered by name, capped at limit                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog is a few hundred handmade items, so a LIKE scan is enough.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use hearth_core::Product;

const PRODUCT_COLUMNS: &str = r#"
    id, sku, name, description, category, price_cents, weight_kg,
    is_active, created_at, updated_at
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let results = repo.search("bowl", 20).await?;
/// let product = repo.get_by_sku("BOWL-WAL-12").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Searches active products by substring of SKU, name or category.
    ///
    /// An empty query lists active products by name.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return self.list_active(limit).await;
        }

        // Escape LIKE wildcards so "50%" searches for a literal percent sign
        let escaped = query
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{}%", escaped);

        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE is_active = 1
              AND (sku LIKE ?1 ESCAPE '\' OR name LIKE ?1 ESCAPE '\' OR category LIKE ?1 ESCAPE '\')
            ORDER BY name
            LIMIT ?2
            "#
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE is_active = 1
            ORDER BY name
            LIMIT ?1
            "#
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by SKU, active or not.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(sku.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name, description, category,
                price_cents, weight_kg, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.weight_kg)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &product.sku),
            other => other,
        })?;

        Ok(product.clone())
    }

    /// Updates every editable field and bumps `updated_at`.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                sku = ?2,
                name = ?3,
                description = ?4,
                category = ?5,
                price_cents = ?6,
                weight_kg = ?7,
                is_active = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.weight_kg)
        .bind(product.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Hides a product from the catalog. Past orders keep their snapshots.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET is_active = 0, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn product(sku: &str, name: &str, category: Option<&str>, cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            sku: sku.to_string(),
            name: name.to_string(),
            description: None,
            category: category.map(str::to_string),
            price_cents: cents,
            weight_kg: Some(0.5),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    async fn repo() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let bowl = product("BOWL-WAL-12", "Walnut Bowl", Some("kitchen"), 3500);
        repo.insert(&bowl).await.unwrap();

        let by_id = repo.get_by_id(&bowl.id).await.unwrap().unwrap();
        assert_eq!(by_id.sku, "BOWL-WAL-12");
        assert_eq!(by_id.weight_kg, Some(0.5));

        let by_sku = repo.get_by_sku("BOWL-WAL-12").await.unwrap().unwrap();
        assert_eq!(by_sku.id, bowl.id);

        assert!(repo.get_by_sku("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let repo = repo().await;
        repo.insert(&product("MUG-01", "Mug", None, 2450)).await.unwrap();

        let err = repo
            .insert(&product("MUG-01", "Other Mug", None, 2450))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "MUG-01"));
    }

    #[tokio::test]
    async fn test_search_matches_sku_name_and_category() {
        let repo = repo().await;
        repo.insert(&product("PINE-CAR-KIT", "Derby Racer", Some("toys"), 500))
            .await
            .unwrap();
        repo.insert(&product("SPOON-01", "Carved Pine Spoon", Some("kitchen"), 1800))
            .await
            .unwrap();
        repo.insert(&product("BOWL-01", "Walnut Bowl", Some("kitchen"), 3500))
            .await
            .unwrap();

        let pine = repo.search("pine", 20).await.unwrap();
        assert_eq!(pine.len(), 2);

        let kitchen = repo.search("KITCHEN", 20).await.unwrap();
        assert_eq!(kitchen.len(), 2);

        let all = repo.search("  ", 20).await.unwrap();
        assert_eq!(all.len(), 3);
        // Ordered by name
        assert_eq!(all[0].name, "Carved Pine Spoon");

        let limited = repo.search("", 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let repo = repo().await;
        repo.insert(&product("MUG-01", "Mug", None, 2450)).await.unwrap();

        assert!(repo.search("%", 20).await.unwrap().is_empty());
        assert!(repo.search("_", 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_soft_delete() {
        let repo = repo().await;
        let mut mug = product("MUG-01", "Mug", None, 2450);
        repo.insert(&mug).await.unwrap();

        mug.price_cents = 2600;
        mug.weight_kg = None;
        repo.update(&mug).await.unwrap();
        let stored = repo.get_by_id(&mug.id).await.unwrap().unwrap();
        assert_eq!(stored.price_cents, 2600);
        assert_eq!(stored.weight_kg, None);

        assert_eq!(repo.count().await.unwrap(), 1);
        repo.soft_delete(&mug.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.search("mug", 20).await.unwrap().is_empty());
        // Still reachable by id for order history
        assert!(!repo.get_by_id(&mug.id).await.unwrap().unwrap().is_active);
    }

    #[tokio::test]
    async fn test_missing_product_errors() {
        let repo = repo().await;
        let ghost = product("GHOST", "Ghost", None, 100);

        assert!(matches!(
            repo.update(&ghost).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.soft_delete(&ghost.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
