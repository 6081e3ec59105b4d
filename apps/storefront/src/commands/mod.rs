//! CLI command implementations.
//!
//! Each submodule exposes `pub async fn run(args, &Context)`. The argument
//! structs live here so `main.rs` can build the clap tree from them.

pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod quote;
pub mod seed;

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};

use hearth_core::{Cart, CartLine, PaymentProvider};
use hearth_db::Database;

use crate::config::StoreConfig;
use crate::error::AppResult;

// =============================================================================
// Arguments
// =============================================================================

/// Arguments for the quote command.
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// JSON cart file (a list of cart lines, or `{ "lines": [...] }`).
    pub cart: PathBuf,

    /// Destination country (ISO 3166-1 alpha-2).
    #[arg(long)]
    pub country: Option<String>,

    /// Price for in-person pickup.
    #[arg(long, conflicts_with = "country")]
    pub pickup: bool,
}

/// Arguments for the catalog command.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Text to match against SKU, name or category. Omit to list everything.
    pub query: Option<String>,

    /// Maximum number of products to show.
    #[arg(short, long, default_value_t = 20)]
    pub limit: u32,
}

/// Arguments for the seed command.
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Print what would be inserted without writing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the orders command.
#[derive(Args, Debug)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    /// List the most recent orders
    List {
        /// Maximum number of orders to show.
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },

    /// Show one order with its items
    Show {
        /// Order id.
        id: String,
    },

    /// Record the provider's payment confirmation
    MarkPaid {
        /// Order id.
        id: String,

        /// Provider transaction id.
        #[arg(short, long)]
        reference: String,
    },

    /// Cancel a pending order
    Cancel {
        /// Order id.
        id: String,
    },
}

/// Arguments for the checkout command.
#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// JSON cart file. Lines are matched to the catalog by SKU.
    pub cart: PathBuf,

    /// Destination country (ISO 3166-1 alpha-2).
    #[arg(long)]
    pub country: Option<String>,

    /// In-person pickup instead of shipping.
    #[arg(long, conflicts_with = "country")]
    pub pickup: bool,

    /// Payment provider: paypal or stripe.
    #[arg(long, default_value = "paypal")]
    pub provider: PaymentProvider,

    /// Check out under this cart session id. The file's lines replace
    /// whatever the session held, and stay saved if the order fails.
    #[arg(long)]
    pub session: Option<String>,
}

// =============================================================================
// Context
// =============================================================================

/// Execution context for CLI commands.
pub struct Context {
    pub config: StoreConfig,
    /// Print machine-readable JSON instead of text.
    pub json: bool,
}

impl Context {
    pub fn new(config: StoreConfig, json: bool) -> Self {
        Context { config, json }
    }

    /// Opens the configured database. Commands that only price carts never
    /// call this.
    pub async fn database(&self) -> AppResult<Database> {
        crate::open_database(&self.config).await
    }

    /// Prints a value as pretty JSON.
    pub fn print_json<T: Serialize>(&self, value: &T) -> AppResult<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

// =============================================================================
// Cart Files
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum CartFile {
    Lines(Vec<CartLine>),
    Cart(Cart),
}

/// Reads a JSON cart file as written by the browser display layer.
pub fn read_cart_file(path: &Path) -> AppResult<Vec<CartLine>> {
    let contents = std::fs::read_to_string(path)?;
    parse_cart(&contents)
}

fn parse_cart(contents: &str) -> AppResult<Vec<CartLine>> {
    let lines = match serde_json::from_str(contents)? {
        CartFile::Lines(lines) => lines,
        CartFile::Cart(cart) => cart.lines,
    };
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cart_accepts_both_shapes() {
        let list = r#"[{"productId": "bowl", "unitPrice": 3500, "weightKg": 0.8, "quantity": 1}]"#;
        let wrapped = r#"{"lines": [{"productId": "bowl", "unitPrice": 3500, "quantity": 2}]}"#;

        let lines = parse_cart(list).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].weight_kg, Some(0.8));

        let lines = parse_cart(wrapped).unwrap();
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].weight_kg, None);
    }

    #[test]
    fn test_parse_cart_rejects_garbage() {
        assert!(parse_cart("{\"items\": 3}").is_err());
        assert!(parse_cart("not json").is_err());
    }
}
