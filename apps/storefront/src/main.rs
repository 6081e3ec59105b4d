//! Hearth CLI - command line tool for the Hearth storefront.
//!
//! Commands:
//! - `hearth quote` - Price a JSON cart file for a country or pickup
//! - `hearth catalog` - Browse or search the catalog
//! - `hearth seed` - Populate the catalog with handcrafted goods
//! - `hearth orders` - List, show, mark paid or cancel orders
//! - `hearth checkout` - Place an order from a JSON cart file

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use hearth_storefront::commands::{
    self, CatalogArgs, CheckoutArgs, Context, OrdersArgs, QuoteArgs, SeedArgs,
};
use hearth_storefront::{init_tracing, StoreConfig};

/// Hearth - price carts and manage orders for a handcrafted-goods shop
#[derive(Parser)]
#[command(name = "hearth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path (default: platform config dir / hearth.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a cart file without placing an order
    Quote(QuoteArgs),

    /// Browse or search the catalog
    Catalog(CatalogArgs),

    /// Populate the catalog with the standard goods
    Seed(SeedArgs),

    /// Inspect and settle orders
    Orders(OrdersArgs),

    /// Place an order from a cart file
    Checkout(CheckoutArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    let config = StoreConfig::load(cli.config).context("Failed to load configuration")?;
    info!(store = %config.store.name, currency = %config.payments.currency, "Configuration loaded");

    let ctx = Context::new(config, cli.json);

    let result = match cli.command {
        Commands::Quote(args) => commands::quote::run(args, &ctx).await,
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Seed(args) => commands::seed::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
    };

    if let Err(e) = result {
        if ctx.json {
            eprintln!("{}", serde_json::to_string(&e)?);
        } else {
            eprintln!("error: {}", e.message);
        }
        std::process::exit(1);
    }

    Ok(())
}
