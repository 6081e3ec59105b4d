//! Quote command: price a cart file without touching the database.

use serde::Serialize;
use tracing::debug;

use hearth_core::validation::validate_country_code;
use hearth_core::{CartLine, DeliveryMethod, OrderTotals, PricingConfig};

use super::{read_cart_file, Context, QuoteArgs};
use crate::error::AppResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub delivery: DeliveryMethod,
    pub totals: OrderTotals,
}

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> AppResult<()> {
    let lines = read_cart_file(&args.cart)?;
    debug!(path = %args.cart.display(), lines = lines.len(), "Cart file loaded");

    let quote = quote(&lines, args.country.as_deref(), args.pickup, &ctx.config.pricing)?;

    if ctx.json {
        return ctx.print_json(&quote);
    }

    let destination = match quote.delivery {
        DeliveryMethod::Pickup => "pickup".to_string(),
        DeliveryMethod::Ship { zone } => zone.to_string(),
    };
    let currency = &ctx.config.payments.currency;

    println!("Destination: {}", destination);
    println!("Weight:      {}", quote.totals.total_weight);
    println!("Subtotal:    {} {}", quote.totals.subtotal, currency);
    match quote.totals.shipping_waiver {
        Some(rule) => println!("Shipping:    free ({:?})", rule),
        None => println!("Shipping:    {} {}", quote.totals.shipping_cost, currency),
    }
    println!("Total:       {} {}", quote.totals.grand_total, currency);

    Ok(())
}

/// Prices `lines` for a country, or for pickup.
///
/// A country code is validated when given; with neither a country nor
/// pickup the cart is priced as pickup, like a checkout page that has no
/// destination yet.
pub fn quote(
    lines: &[CartLine],
    country: Option<&str>,
    pickup: bool,
    config: &PricingConfig,
) -> AppResult<Quote> {
    let country = country.map(validate_country_code).transpose()?;
    let delivery = config.delivery_to(country.as_deref(), pickup);
    let totals = config.quote(lines, delivery);

    Ok(Quote { delivery, totals })
}
