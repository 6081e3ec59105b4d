//! Catalog command: browse active products, optionally filtered.

use std::time::Instant;

use tracing::{debug, info};

use hearth_core::validation::validate_search_query;
use hearth_core::Product;
use hearth_db::Database;

use super::{CatalogArgs, Context};
use crate::error::AppResult;

/// Upper bound on `--limit`.
const MAX_RESULTS: u32 = 100;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> AppResult<()> {
    let db = ctx.database().await?;
    let products = search_catalog(&db, args.query.as_deref().unwrap_or_default(), args.limit).await?;

    if ctx.json {
        return ctx.print_json(&products);
    }

    if products.is_empty() {
        println!("No matching products");
        return Ok(());
    }

    println!("{:<16}  {:<32}  {:<16}  {:>10}  {:>7}", "SKU", "NAME", "CATEGORY", "PRICE", "KG");
    for p in &products {
        let weight = match p.weight_kg {
            Some(kg) => format!("{:.2}", kg),
            None => "-".to_string(),
        };
        println!(
            "{:<16}  {:<32}  {:<16}  {:>10}  {:>7}",
            p.sku,
            p.name,
            p.category.as_deref().unwrap_or(""),
            p.price().to_string(),
            weight
        );
    }

    Ok(())
}

/// Searches active products by SKU, name or category.
///
/// An empty query lists everything. The limit is capped at [`MAX_RESULTS`].
pub async fn search_catalog(db: &Database, query: &str, limit: u32) -> AppResult<Vec<Product>> {
    let start = Instant::now();
    let query = validate_search_query(query)?;
    let limit = limit.clamp(1, MAX_RESULTS);

    debug!(query = %query, limit = %limit, "Catalog search");
    let products = db.products().search(&query, limit).await?;

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = products.len(),
        "Catalog search complete"
    );
    Ok(products)
}
