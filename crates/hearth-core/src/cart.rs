//! # Cart
//!
//! The shopper's cart: an ordered list of [`CartLine`]s, unique by product.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Operations                                 │
//! │                                                                         │
//! │  add_product(p, n)      line exists? ── yes ──► quantity += n           │
//! │                              │ no                                       │
//! │                              └──────────────► push(CartLine::from(p))   │
//! │                                                                         │
//! │  set_quantity(id, 0)    ──────────────────────► remove_line(id)         │
//! │  set_quantity(id, n)    ──────────────────────► quantity = n            │
//! │  remove_line(id)        ──────────────────────► retain(!= id)           │
//! │  clear()                ──────────────────────► lines.clear()           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart enforces its limits on the way in. The calculator still clamps,
//! because lines also arrive from places that never went through `Cart`
//! (a stored session, a browser-side cart).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{CartLine, Product};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges)
/// - Quantity is between 1 and [`MAX_ITEM_QUANTITY`]
/// - At most [`MAX_CART_ITEMS`] distinct lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Wraps lines loaded from storage. No limits are enforced here.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Cart { lines }
    }

    /// Adds a product, or increases the quantity if it is already present.
    pub fn add_product(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let new_qty = line.quantity.saturating_add(quantity);
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Sets a line's quantity. Zero removes the line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_line(product_id);
        }

        if quantity < 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::LineNotInCart(product_id.to_string())),
        }
    }

    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::LineNotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
