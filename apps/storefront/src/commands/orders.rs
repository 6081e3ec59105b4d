//! Orders command: list, inspect and settle orders.

use serde::Serialize;
use tracing::info;

use hearth_core::validation::validate_uuid;
use hearth_core::{Money, Order, OrderItem};

use super::{Context, OrdersArgs, OrdersCommand};
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
struct OrderDetail {
    order: Order,
    items: Vec<OrderItem>,
}

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> AppResult<()> {
    let db = ctx.database().await?;
    let orders = db.orders();

    match args.command {
        OrdersCommand::List { limit } => {
            let recent = orders.list_recent(limit).await?;
            if ctx.json {
                ctx.print_json(&recent)
            } else {
                print_list(&recent);
                Ok(())
            }
        }
        OrdersCommand::Show { id } => {
            validate_uuid(&id)?;
            let order = orders
                .get_by_id(&id)
                .await?
                .ok_or_else(|| AppError::not_found("Order", &id))?;
            let items = orders.get_items(&id).await?;

            if ctx.json {
                ctx.print_json(&OrderDetail { order, items })
            } else {
                print_detail(&order, &items);
                Ok(())
            }
        }
        OrdersCommand::MarkPaid { id, reference } => {
            validate_uuid(&id)?;
            if reference.trim().is_empty() {
                return Err(AppError::validation("reference is required"));
            }
            orders.mark_paid(&id, reference.trim()).await?;
            info!(order_id = %id, reference = %reference, "Order marked paid");
            println!("Order {} marked paid", id);
            Ok(())
        }
        OrdersCommand::Cancel { id } => {
            validate_uuid(&id)?;
            orders.cancel(&id).await?;
            info!(order_id = %id, "Order cancelled");
            println!("Order {} cancelled", id);
            Ok(())
        }
    }
}

fn print_list(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders yet");
        return;
    }

    println!(
        "{:<36}  {:<9}  {:<6}  {:>10}  {}",
        "ID", "STATUS", "VIA", "TOTAL", "CREATED"
    );
    for order in orders {
        println!(
            "{:<36}  {:<9}  {:<6}  {:>10}  {}",
            order.id,
            order.status.as_str(),
            order.payment_provider.to_string(),
            order.grand_total().to_string(),
            order.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}

fn print_detail(order: &Order, items: &[OrderItem]) {
    let destination = match (order.zone, &order.country_code) {
        (Some(zone), Some(country)) => format!("{} ({})", country, zone),
        (Some(zone), None) => zone.to_string(),
        _ => "pickup".to_string(),
    };

    println!("Order {}", order.id);
    println!("  Status:      {}", order.status);
    println!("  Destination: {}", destination);
    println!("  Provider:    {}", order.payment_provider);
    if let Some(reference) = &order.payment_reference {
        println!("  Reference:   {}", reference);
    }
    println!();

    for item in items {
        println!(
            "  {:>3} × {:<32} {:>10}",
            item.quantity,
            item.name_snapshot,
            Money::from_cents(item.line_total_cents).to_string()
        );
    }
    println!();

    println!("  Subtotal:    {}", Money::from_cents(order.subtotal_cents));
    match order.shipping_waiver {
        Some(rule) => println!("  Shipping:    free ({:?})", rule),
        None => println!("  Shipping:    {}", Money::from_cents(order.shipping_cents)),
    }
    println!("  Total:       {}", order.grand_total());
}
