//! # hearth-db: Storage Layer for the Hearth Storefront
//!
//! SQLite persistence for the catalog, shopper carts and placed orders,
//! using sqlx on tokio.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Hearth Data Flow                                 │
//! │                                                                         │
//! │  CartSession / Checkout (hearth-storefront)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     hearth-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ Product       │    │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ Cart          │    │ 001_initial  │  │   │
//! │  │   └───────────────┘    │ Order         │    └──────────────┘  │   │
//! │  │                        └───────┬───────┘                       │   │
//! │  │                                │ CartStore trait               │   │
//! │  │                        ┌───────▼───────┐                       │   │
//! │  │                        │MemoryCartStore│                       │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir)/hearth.db                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hearth_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("hearth.db")).await?;
//! let products = db.products().search("bowl", 20).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::{CartStore, MemoryCartStore};

pub use repository::cart::CartRepository;
pub use repository::order::{generate_order_id, OrderRepository};
pub use repository::product::{generate_product_id, ProductRepository};
