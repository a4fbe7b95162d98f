//! Storefront domain types for SwiftCart.
//!
//! This crate holds the pure data model shared by the SwiftCart engine:
//!
//! - **Money**: minor-unit integer amounts with checked arithmetic
//! - **Catalog**: products and per-product stock levels
//! - **Cart**: a shopper's in-progress selection with live totals
//! - **Order**: the durable, price-immutable result of a checkout
//!
//! Nothing in here performs I/O or takes locks; the concurrency story
//! lives in `swiftcart-engine`.
//!
//! # Example
//!
//! ```rust
//! use swiftcart_commerce::prelude::*;
//!
//! let shopper = ShopperId::new("shopper-1");
//! let product = ProductId::new("prod-1");
//!
//! let mut cart = Cart::new(shopper);
//! cart.upsert_item(product.clone(), 2, Money::new(1999, Currency::USD));
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.line(&product).map(|l| l.quantity), Some(2));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod order;

pub use error::CommerceError;
pub use ids::{OrderId, ProductId, ShopperId};
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::{OrderId, ProductId, ShopperId};
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Product, StockLevel};

    // Cart
    pub use crate::cart::{Cart, CartItem, CartTotals, LineTotals};

    // Order
    pub use crate::order::{Order, OrderItem, OrderStatus};
}
