//! # Cart Store
//!
//! The persistence seam a cart session talks to.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartSession ──► Arc<dyn CartStore>                                     │
//! │                        │                                                │
//! │            ┌───────────┴────────────┐                                   │
//! │            ▼                        ▼                                   │
//! │     CartRepository           MemoryCartStore                            │
//! │     (SQLite, durable)        (HashMap, tests / ephemeral sessions)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::DbResult;
use crate::repository::cart::CartRepository;
use hearth_core::CartLine;

/// Loads and saves whole carts by session id.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Lines for the session; empty if the session has never saved.
    async fn load_cart(&self, session_id: &str) -> DbResult<Vec<CartLine>>;

    /// Replaces the session's lines.
    ///
    /// Lines are keyed by product id. When two lines share a product id the
    /// later one wins and takes the later position; quantities are not
    /// merged. Callers that want merging go through `Cart::add_product`.
    async fn save_cart(&self, session_id: &str, lines: &[CartLine]) -> DbResult<()>;

    async fn clear_cart(&self, session_id: &str) -> DbResult<()>;
}

#[async_trait]
impl CartStore for CartRepository {
    async fn load_cart(&self, session_id: &str) -> DbResult<Vec<CartLine>> {
        self.load(session_id).await
    }

    async fn save_cart(&self, session_id: &str, lines: &[CartLine]) -> DbResult<()> {
        self.save(session_id, lines).await
    }

    async fn clear_cart(&self, session_id: &str) -> DbResult<()> {
        self.clear(session_id).await
    }
}

/// In-process cart store.
///
/// Intended for tests and sessions that need not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    carts: RwLock<HashMap<String, Vec<CartLine>>>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions holding a cart.
    pub async fn session_count(&self) -> usize {
        self.carts.read().await.len()
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn load_cart(&self, session_id: &str) -> DbResult<Vec<CartLine>> {
        Ok(self
            .carts
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_cart(&self, session_id: &str, lines: &[CartLine]) -> DbResult<()> {
        let mut stored: Vec<CartLine> = Vec::with_capacity(lines.len());
        for line in lines {
            stored.retain(|l| l.product_id != line.product_id);
            stored.push(line.clone());
        }

        self.carts.write().await.insert(session_id.to_string(), stored);
        Ok(())
    }

    async fn clear_cart(&self, session_id: &str) -> DbResult<()> {
        self.carts.write().await.remove(session_id);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use hearth_core::Money;
    use std::sync::Arc;

    fn line(product_id: &str) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            sku: String::new(),
            name: product_id.to_string(),
            category: None,
            unit_price: Money::from_cents(1000),
            weight_kg: Some(0.5),
            quantity: 1,
        }
    }

    async fn exercise(store: Arc<dyn CartStore>) {
        assert!(store.load_cart("s1").await.unwrap().is_empty());

        store.save_cart("s1", &[line("mug"), line("bowl")]).await.unwrap();
        assert_eq!(store.load_cart("s1").await.unwrap().len(), 2);
        assert!(store.load_cart("s2").await.unwrap().is_empty());

        store.save_cart("s1", &[line("spoon")]).await.unwrap();
        assert_eq!(store.load_cart("s1").await.unwrap(), vec![line("spoon")]);

        store.clear_cart("s1").await.unwrap();
        assert!(store.load_cart("s1").await.unwrap().is_empty());

        // Duplicate product ids: the later line replaces the earlier one
        let mut bigger = line("mug");
        bigger.quantity = 3;
        store
            .save_cart("s3", &[line("mug"), line("bowl"), bigger.clone()])
            .await
            .unwrap();
        assert_eq!(store.load_cart("s3").await.unwrap(), vec![line("bowl"), bigger]);
    }

    #[tokio::test]
    async fn test_memory_store_contract() {
        exercise(Arc::new(MemoryCartStore::new())).await;
    }

    #[tokio::test]
    async fn test_sqlite_store_contract() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        exercise(Arc::new(db.carts())).await;
    }

    #[tokio::test]
    async fn test_memory_store_drops_cleared_sessions() {
        let store = MemoryCartStore::new();
        store.save_cart("s1", &[line("mug")]).await.unwrap();
        store.save_cart("s2", &[line("mug")]).await.unwrap();
        assert_eq!(store.session_count().await, 2);

        store.clear_cart("s1").await.unwrap();
        assert_eq!(store.session_count().await, 1);
    }
}
