//! # Cart Session
//!
//! One shopper's cart, kept in sync with a [`CartStore`].
//!
//! ## Write-Through
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Session Operations                              │
//! │                                                                         │
//! │  Shopper Action           CartSession             CartStore            │
//! │  ──────────────           ───────────             ─────────            │
//! │                                                                         │
//! │  Open page ──────────────► open() ──────────────► load_cart()          │
//! │                                                                         │
//! │  Add to cart ────────────► add_product() ───────► save_cart()          │
//! │  Change quantity ────────► set_quantity() ──────► save_cart()          │
//! │  Remove ─────────────────► remove_line() ───────► save_cart()          │
//! │  Load a saved cart ──────► replace() ───────────► save_cart()          │
//! │  Empty cart ─────────────► clear() ─────────────► clear_cart()         │
//! │                                                                         │
//! │  Any of the above ───────► totals() ────────────► (no I/O)             │
//! │                                                                         │
//! │  NOTE: A change is applied to a copy, persisted, then adopted.         │
//! │        A failed save leaves the session as it was.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use hearth_core::{
    calculate_totals, Cart, CartLine, DeliveryMethod, OrderTotals, PricingConfig, Product,
};
use hearth_db::CartStore;

use crate::error::AppResult;

/// A shopper's cart bound to its persistence.
pub struct CartSession {
    session_id: String,
    cart: Cart,
    store: Arc<dyn CartStore>,
}

impl CartSession {
    /// Opens a session, restoring whatever the store holds for it.
    pub async fn open(session_id: impl Into<String>, store: Arc<dyn CartStore>) -> AppResult<Self> {
        let session_id = session_id.into();
        let lines = store.load_cart(&session_id).await?;
        debug!(session_id = %session_id, lines = lines.len(), "Cart session opened");

        Ok(CartSession {
            session_id,
            cart: Cart::from_lines(lines),
            store,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.cart.lines
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub async fn add_product(&mut self, product: &Product, quantity: i64) -> AppResult<()> {
        let mut next = self.cart.clone();
        next.add_product(product, quantity)?;
        self.commit(next).await?;

        debug!(session_id = %self.session_id, sku = %product.sku, quantity, "Added to cart");
        Ok(())
    }

    /// Zero removes the line.
    pub async fn set_quantity(&mut self, product_id: &str, quantity: i64) -> AppResult<()> {
        let mut next = self.cart.clone();
        next.set_quantity(product_id, quantity)?;
        self.commit(next).await
    }

    pub async fn remove_line(&mut self, product_id: &str) -> AppResult<()> {
        let mut next = self.cart.clone();
        next.remove_line(product_id)?;
        self.commit(next).await
    }

    /// Swaps in a whole cart built elsewhere, in one save.
    pub async fn replace(&mut self, cart: Cart) -> AppResult<()> {
        self.commit(cart).await?;

        debug!(session_id = %self.session_id, lines = self.cart.item_count(), "Cart replaced");
        Ok(())
    }

    pub async fn clear(&mut self) -> AppResult<()> {
        self.store.clear_cart(&self.session_id).await?;
        self.cart.clear();

        debug!(session_id = %self.session_id, "Cart cleared");
        Ok(())
    }

    /// Live totals for the current cart and destination.
    pub fn totals(&self, delivery: DeliveryMethod, config: &PricingConfig) -> OrderTotals {
        calculate_totals(&self.cart.lines, delivery, config)
    }

    async fn commit(&mut self, next: Cart) -> AppResult<()> {
        self.store.save_cart(&self.session_id, &next.lines).await?;
        self.cart = next;
        Ok(())
    }
}

/// Generates a new session id.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hearth_core::{DestinationZone, Money};
    use hearth_db::MemoryCartStore;

    fn product(id: &str, name: &str, cents: i64, weight_kg: Option<f64>) -> Product {
        Product {
            id: id.to_string(),
            sku: id.to_uppercase(),
            name: name.to_string(),
            description: None,
            category: None,
            price_cents: cents,
            weight_kg,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_mutations_are_persisted() {
        let store = Arc::new(MemoryCartStore::new());
        let mut session = CartSession::open("s1", store.clone()).await.unwrap();

        session
            .add_product(&product("bowl", "Walnut Bowl", 3500, Some(0.8)), 2)
            .await
            .unwrap();
        session
            .add_product(&product("mug", "Mug", 2450, Some(0.4)), 1)
            .await
            .unwrap();
        session.set_quantity("bowl", 1).await.unwrap();
        session.remove_line("mug").await.unwrap();

        let reopened = CartSession::open("s1", store).await.unwrap();
        assert_eq!(reopened.lines().len(), 1);
        assert_eq!(reopened.lines()[0].product_id, "bowl");
        assert_eq!(reopened.lines()[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_rejected_change_leaves_cart_alone() {
        let store = Arc::new(MemoryCartStore::new());
        let mut session = CartSession::open("s1", store.clone()).await.unwrap();
        session
            .add_product(&product("bowl", "Walnut Bowl", 3500, Some(0.8)), 1)
            .await
            .unwrap();

        assert!(session.set_quantity("spoon", 2).await.is_err());
        assert!(session
            .add_product(&product("bowl", "Walnut Bowl", 3500, Some(0.8)), 0)
            .await
            .is_err());

        assert_eq!(session.cart().total_quantity(), 1);
        let reopened = CartSession::open("s1", store).await.unwrap();
        assert_eq!(reopened.cart().total_quantity(), 1);
    }

    #[tokio::test]
    async fn test_replace_overwrites_stored_lines() {
        let store = Arc::new(MemoryCartStore::new());
        let mut session = CartSession::open("s1", store.clone()).await.unwrap();
        session
            .add_product(&product("bowl", "Walnut Bowl", 3500, Some(0.8)), 2)
            .await
            .unwrap();

        let mut cart = Cart::new();
        cart.add_product(&product("mug", "Mug", 2450, Some(0.4)), 1)
            .unwrap();
        session.replace(cart).await.unwrap();

        let reopened = CartSession::open("s1", store).await.unwrap();
        assert_eq!(reopened.lines().len(), 1);
        assert_eq!(reopened.lines()[0].product_id, "mug");
    }

    #[tokio::test]
    async fn test_clear() {
        let store = Arc::new(MemoryCartStore::new());
        let mut session = CartSession::open("s1", store.clone()).await.unwrap();
        session
            .add_product(&product("bowl", "Walnut Bowl", 3500, Some(0.8)), 1)
            .await
            .unwrap();

        session.clear().await.unwrap();
        assert!(session.is_empty());
        assert!(CartSession::open("s1", store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = Arc::new(MemoryCartStore::new());
        let mut a = CartSession::open(new_session_id(), store.clone()).await.unwrap();
        let b = CartSession::open(new_session_id(), store.clone()).await.unwrap();

        a.add_product(&product("bowl", "Walnut Bowl", 3500, Some(0.8)), 1)
            .await
            .unwrap();

        assert_ne!(a.session_id(), b.session_id());
        assert!(CartSession::open(b.session_id(), store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_totals_follow_cart() {
        let store = Arc::new(MemoryCartStore::new());
        let config = PricingConfig::default();
        let mut session = CartSession::open("s1", store).await.unwrap();
        let domestic = DeliveryMethod::Ship {
            zone: DestinationZone::Domestic,
        };

        assert_eq!(session.totals(domestic, &config), OrderTotals::zero());

        session
            .add_product(&product("bowl", "Walnut Bowl", 3500, Some(0.8)), 1)
            .await
            .unwrap();
        let totals = session.totals(domestic, &config);
        assert_eq!(totals.grand_total, Money::from_cents(4350));

        let pickup = session.totals(DeliveryMethod::Pickup, &config);
        assert_eq!(pickup.grand_total, Money::from_cents(3500));
    }
}
