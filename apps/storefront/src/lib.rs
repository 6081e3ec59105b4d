//! # Hearth Storefront Library
//!
//! Application layer for the Hearth storefront: configuration, the shopper's
//! cart session, checkout, and the `hearth` command line.
//!
//! ## Module Organization
//! ```text
//! hearth_storefront/
//! ├── lib.rs          ◄─── You are here (logging & database setup)
//! ├── config.rs       ◄─── StoreConfig: defaults → hearth.toml → HEARTH_* env
//! ├── session.rs      ◄─── CartSession over an injected CartStore
//! ├── checkout.rs     ◄─── Cart → Order → payment redirect
//! ├── commands/
//! │   ├── mod.rs      ◄─── Argument structs shared with main.rs
//! │   ├── catalog.rs  ◄─── Browse / search products
//! │   ├── quote.rs    ◄─── Price a JSON cart file
//! │   ├── seed.rs     ◄─── Populate the catalog
//! │   ├── orders.rs   ◄─── List / show / settle orders
//! │   └── checkout.rs ◄─── Place an order from a JSON cart file
//! └── error.rs        ◄─── AppError returned by everything above
//! ```
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Checkout Flow                                  │
//! │                                                                         │
//! │  CartSession ──► Checkout::place ──► calculate_totals (hearth-core)    │
//! │       │                 │                                               │
//! │       │                 ├──────────► build_redirect  (hearth-core)     │
//! │       │                 │                                               │
//! │       │                 └──────────► OrderRepository (hearth-db)       │
//! │       │                                                                 │
//! │       └──── every mutation ─────────► CartStore      (hearth-db)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod checkout;
pub mod commands;
pub mod config;
pub mod error;
pub mod session;

use tracing::info;
use tracing_subscriber::EnvFilter;

use hearth_db::{Database, DbConfig};

pub use checkout::{Checkout, CheckoutReceipt, CheckoutRequest};
pub use config::StoreConfig;
pub use error::{AppError, AppResult, ErrorCode};
pub use session::CartSession;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=hearth=trace` - Include the calculator's trace events
/// - Default: `info,hearth=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hearth=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens (creating if needed) the database the config points at and applies
/// pending migrations.
pub async fn open_database(config: &StoreConfig) -> AppResult<Database> {
    let path = config.database_path()?;
    info!(path = %path.display(), "Opening database");

    let db = Database::new(DbConfig::new(path)).await?;
    Ok(db)
}
