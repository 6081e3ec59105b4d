//! Seed command: populate the catalog with the workshop's standard goods.
//!
//! Existing SKUs are left alone, so running it twice is harmless.

use chrono::Utc;
use tracing::{debug, info};

use hearth_core::validation::{
    validate_price_cents, validate_product_name, validate_sku, validate_weight_kg,
};
use hearth_core::Product;
use hearth_db::{generate_product_id, Database};

use super::{Context, SeedArgs};
use crate::error::AppResult;

/// (sku, name, category, price in cents, weight in kg)
const CATALOG: &[(&str, &str, &str, i64, Option<f64>)] = &[
    ("WALNUT-BOWL-L", "Walnut Salad Bowl", "kitchen", 8500, Some(1.4)),
    ("WALNUT-BOWL-S", "Walnut Serving Bowl", "kitchen", 3500, Some(0.8)),
    ("MAPLE-BOARD", "Maple Cutting Board", "kitchen", 6200, Some(1.9)),
    ("CHERRY-SPOON", "Cherry Cooking Spoon", "kitchen", 1800, Some(0.1)),
    ("STONEWARE-MUG", "Stoneware Mug", "pottery", 2450, Some(0.4)),
    ("RAKU-VASE", "Raku Vase", "pottery", 14000, Some(2.6)),
    ("WOOL-THROW", "Hand-woven Wool Throw", "textiles", 21000, Some(1.7)),
    ("LINEN-TOWELS", "Linen Tea Towels (set of 3)", "textiles", 3200, None),
    ("OAK-BENCH", "White Oak Entry Bench", "furniture", 89000, Some(18.5)),
    ("PINE-CAR-KIT", "Pine Car Kit", "pinewood derby", 500, Some(0.3)),
    ("DERBY-WHEELS", "Derby Car Wheel Set", "pinewood derby", 500, Some(0.05)),
    ("BEESWAX-CANDLE", "Beeswax Pillar Candle", "home", 2800, Some(0.6)),
];

/// Run the seed command.
pub async fn run(args: SeedArgs, ctx: &Context) -> AppResult<()> {
    let products = catalog_products()?;

    if args.dry_run {
        if ctx.json {
            return ctx.print_json(&products);
        }
        for p in &products {
            println!("{:<16} {:<32} {:>10}", p.sku, p.name, p.price().to_string());
        }
        return Ok(());
    }

    let db = ctx.database().await?;
    let inserted = seed_catalog(&db, &products).await?;
    db.close().await;

    if ctx.json {
        return ctx.print_json(&serde_json::json!({
            "inserted": inserted,
            "skipped": products.len() - inserted,
        }));
    }
    println!(
        "Seeded {} products ({} already present)",
        inserted,
        products.len() - inserted
    );

    Ok(())
}

/// Builds the seed products, validating each the way a catalog edit would.
pub fn catalog_products() -> AppResult<Vec<Product>> {
    let now = Utc::now();

    CATALOG
        .iter()
        .map(|&(sku, name, category, price_cents, weight_kg)| -> AppResult<Product> {
            validate_sku(sku)?;
            validate_product_name(name)?;
            validate_price_cents(price_cents)?;
            validate_weight_kg(weight_kg)?;

            Ok(Product {
                id: generate_product_id(),
                sku: sku.to_string(),
                name: name.to_string(),
                description: None,
                category: Some(category.to_string()),
                price_cents,
                weight_kg,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
        })
        .collect()
}

/// Inserts every product whose SKU is not in the catalog yet.
///
/// Returns the number inserted.
pub async fn seed_catalog(db: &Database, products: &[Product]) -> AppResult<usize> {
    let repo = db.products();
    let mut inserted = 0;

    for product in products {
        if repo.get_by_sku(&product.sku).await?.is_some() {
            debug!(sku = %product.sku, "Already in catalog, skipping");
            continue;
        }
        repo.insert(product).await?;
        inserted += 1;
    }

    info!(inserted, total = products.len(), "Catalog seeded");
    Ok(inserted)
}
