//! # Repository Module
//!
//! SQL for each table family lives behind one repository type.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories                                         │
//! │                                                                         │
//! │  Checkout / CLI                                                         │
//! │       │                                                                 │
//! │       │  db.products().search("bowl", 20)                               │
//! │       │  db.carts().save(session, &lines)                               │
//! │       │  db.orders().insert(&order, &items)                             │
//! │       ▼                                                                 │
//! │  ProductRepository   CartRepository   OrderRepository                   │
//! │       │                    │                 │                          │
//! │       ▼                    ▼                 ▼                          │
//! │  products            cart_lines        orders + order_items             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD and search
//! - [`cart::CartRepository`] - Per-session cart lines
//! - [`order::OrderRepository`] - Orders, item snapshots, status changes

pub mod cart;
pub mod order;
pub mod product;
