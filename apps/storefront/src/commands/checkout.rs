//! Checkout command: place an order from a cart file.
//!
//! Prices come from the catalog, not the file. Each line is matched by SKU
//! (or product id when the SKU is blank), the whole cart is built at catalog
//! price and saved to the session in one go, then checked out like a browser
//! cart would be.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use hearth_core::payment::PaymentRedirect;
use hearth_core::validation::validate_quantity;
use hearth_core::{Cart, CartLine, Order, OrderTotals, Product};
use hearth_db::{CartStore, Database};

use super::{read_cart_file, CheckoutArgs, Context};
use crate::checkout::{Checkout, CheckoutReceipt, CheckoutRequest};
use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};
use crate::session::{new_session_id, CartSession};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutOutput<'a> {
    order: &'a Order,
    totals: &'a OrderTotals,
    payment_url: &'a str,
    /// Form body to POST to `payment_url` (Stripe only).
    #[serde(skip_serializing_if = "Option::is_none")]
    session_request: Option<&'a str>,
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> AppResult<()> {
    let lines = read_cart_file(&args.cart)?;
    let db = ctx.database().await?;
    let store: Arc<dyn CartStore> = Arc::new(db.carts());

    let request = CheckoutRequest {
        country_code: args.country,
        pickup: args.pickup,
        provider: args.provider,
    };
    let receipt = checkout_lines(&db, store, &ctx.config, args.session, &lines, &request).await?;

    print_receipt(&receipt, ctx)
}

/// Loads `lines` into a cart session and places the order.
///
/// With no `session_id` a throwaway session is used and cleared again if the
/// order is not placed. A named session keeps the file's lines on failure so
/// the same id can be retried.
pub async fn checkout_lines(
    db: &Database,
    store: Arc<dyn CartStore>,
    config: &StoreConfig,
    session_id: Option<String>,
    lines: &[CartLine],
    request: &CheckoutRequest,
) -> AppResult<CheckoutReceipt> {
    let throwaway = session_id.is_none();
    let session_id = session_id.unwrap_or_else(new_session_id);
    let mut session = CartSession::open(session_id, store).await?;

    let placed = match fill_from_catalog(db, &mut session, lines).await {
        Ok(()) => Checkout::new(config, db.orders()).place(&mut session, request).await,
        Err(e) => Err(e),
    };

    if placed.is_err() && throwaway && !session.is_empty() {
        if let Err(e) = session.clear().await {
            warn!(session_id = %session.session_id(), error = %e, "Failed to clear abandoned cart");
        }
    }

    placed
}

/// Replaces the session's cart with the file's lines at the catalog's
/// current price.
///
/// Every line is resolved before anything is saved, so an unknown SKU or a
/// bad quantity leaves the stored cart as it was. Repeated products merge.
pub async fn fill_from_catalog(
    db: &Database,
    session: &mut CartSession,
    lines: &[CartLine],
) -> AppResult<()> {
    let products = db.products();
    let mut cart = Cart::new();

    for line in lines {
        validate_quantity(line.quantity)?;

        let product: Option<Product> = if line.sku.trim().is_empty() {
            products.get_by_id(&line.product_id).await?
        } else {
            products.get_by_sku(line.sku.trim()).await?
        };

        let product = match product {
            Some(p) if p.is_active => p,
            _ => {
                let key = if line.sku.trim().is_empty() {
                    &line.product_id
                } else {
                    &line.sku
                };
                return Err(AppError::not_found("Product", key));
            }
        };

        if product.price_cents != line.unit_price.cents() {
            debug!(
                sku = %product.sku,
                cart_price = %line.unit_price,
                catalog_price = %product.price(),
                "Cart price differs from catalog, using catalog"
            );
        }
        cart.add_product(&product, line.quantity)?;
    }

    session.replace(cart).await
}

fn print_receipt(receipt: &CheckoutReceipt, ctx: &Context) -> AppResult<()> {
    let session_request = match &receipt.redirect {
        PaymentRedirect::Redirect(_) => None,
        PaymentRedirect::CreateSession(request) => Some(request.body.as_str()),
    };

    if ctx.json {
        return ctx.print_json(&CheckoutOutput {
            order: &receipt.order,
            totals: &receipt.totals,
            payment_url: receipt.redirect.url().as_str(),
            session_request,
        });
    }

    let currency = &ctx.config.payments.currency;
    println!("Order {} placed ({} items)", receipt.order.id, receipt.items.len());
    println!("  Subtotal: {} {}", receipt.totals.subtotal, currency);
    println!("  Shipping: {} {}", receipt.totals.shipping_cost, currency);
    println!("  Total:    {} {}", receipt.totals.grand_total, currency);
    println!();

    match session_request {
        None => println!("Pay at: {}", receipt.redirect.url()),
        Some(body) => {
            println!("Create the payment session with:");
            println!("  POST {}", receipt.redirect.url());
            println!("  {}", body);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{Money, PaymentProvider};
    use hearth_db::{DbConfig, MemoryCartStore};

    use crate::commands::seed::{catalog_products, seed_catalog};
    use crate::error::ErrorCode;

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalog(&db, &catalog_products().unwrap()).await.unwrap();
        db
    }

    fn file_line(sku: &str, cents: i64, quantity: i64) -> CartLine {
        CartLine {
            product_id: String::new(),
            sku: sku.to_string(),
            name: String::new(),
            category: None,
            unit_price: Money::from_cents(cents),
            weight_kg: None,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_catalog_price_wins() {
        let db = seeded().await;
        let store: Arc<dyn CartStore> = Arc::new(db.carts());
        let mut session = CartSession::open("cli", store).await.unwrap();

        fill_from_catalog(&db, &mut session, &[file_line("WALNUT-BOWL-S", 1, 2)])
            .await
            .unwrap();

        assert_eq!(session.lines().len(), 1);
        assert_eq!(session.lines()[0].unit_price, Money::from_cents(3500));
        assert_eq!(session.lines()[0].weight_kg, Some(0.8));
        assert_eq!(session.lines()[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_unknown_sku() {
        let db = seeded().await;
        let store: Arc<dyn CartStore> = Arc::new(db.carts());
        let mut session = CartSession::open("cli", store).await.unwrap();

        let err = fill_from_catalog(&db, &mut session, &[file_line("NOPE", 100, 1)])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_failed_fill_saves_nothing() {
        let db = seeded().await;
        let store: Arc<dyn CartStore> = Arc::new(db.carts());
        let mut session = CartSession::open("retry", store.clone()).await.unwrap();

        let err = fill_from_catalog(
            &db,
            &mut session,
            &[file_line("WALNUT-BOWL-S", 3500, 1), file_line("NOPE", 100, 1)],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(session.is_empty());
        assert!(db.carts().load("retry").await.unwrap().is_empty());

        let mut retried = CartSession::open("retry", store).await.unwrap();
        fill_from_catalog(&db, &mut retried, &[file_line("WALNUT-BOWL-S", 3500, 1)])
            .await
            .unwrap();
        assert_eq!(retried.lines().len(), 1);
        assert_eq!(retried.lines()[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_refill_replaces_instead_of_merging() {
        let db = seeded().await;
        let store: Arc<dyn CartStore> = Arc::new(db.carts());
        let mut session = CartSession::open("again", store.clone()).await.unwrap();
        let file = [file_line("STONEWARE-MUG", 2450, 2), file_line("STONEWARE-MUG", 2450, 1)];

        fill_from_catalog(&db, &mut session, &file).await.unwrap();
        fill_from_catalog(&db, &mut session, &file).await.unwrap();

        let stored = db.carts().load("again").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_bad_quantity_rejected_before_lookup() {
        let db = seeded().await;
        let store: Arc<dyn CartStore> = Arc::new(db.carts());
        let mut session = CartSession::open("cli", store).await.unwrap();

        let err = fill_from_catalog(&db, &mut session, &[file_line("NOPE", 100, 0)])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_throwaway_session_cleared_when_checkout_fails() {
        let db = seeded().await;
        let store = Arc::new(MemoryCartStore::new());
        let config = StoreConfig::default();
        let request = CheckoutRequest {
            country_code: None,
            pickup: false,
            provider: PaymentProvider::PayPal,
        };

        let err = checkout_lines(
            &db,
            store.clone(),
            &config,
            None,
            &[file_line("WALNUT-BOWL-S", 3500, 1)],
            &request,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(store.session_count().await, 0);

        // A named session keeps its cart for the retry
        checkout_lines(
            &db,
            store.clone(),
            &config,
            Some("named".to_string()),
            &[file_line("WALNUT-BOWL-S", 3500, 1)],
            &request,
        )
        .await
        .unwrap_err();
        assert_eq!(store.load_cart("named").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seeded_checkout_end_to_end() {
        let db = seeded().await;
        let mut config = StoreConfig::default();
        config.payments.paypal.business = "shop@hearth.example".to_string();

        let store: Arc<dyn CartStore> = Arc::new(db.carts());
        let mut session = CartSession::open("cli", store).await.unwrap();
        fill_from_catalog(
            &db,
            &mut session,
            &[file_line("WALNUT-BOWL-S", 3500, 1), file_line("STONEWARE-MUG", 2450, 2)],
        )
        .await
        .unwrap();

        let receipt = Checkout::new(&config, db.orders())
            .place(
                &mut session,
                &CheckoutRequest {
                    country_code: Some("US".to_string()),
                    pickup: false,
                    provider: PaymentProvider::PayPal,
                },
            )
            .await
            .unwrap();

        assert_eq!(receipt.order.subtotal_cents, 8400);
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(db.orders().list_recent(5).await.unwrap().len(), 1);
    }
}
