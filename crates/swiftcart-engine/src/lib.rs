//! Cart-to-order consistency engine for SwiftCart.
//!
//! The engine owns the only parts of the storefront with real correctness
//! hazards: concurrent shoppers racing for limited stock, partial failures
//! mid-checkout, and cart state that must track fluctuating prices and
//! inventory. It guarantees that no product is oversold and that no order
//! is ever recorded without its stock, via a reserve/commit-or-release
//! saga.
//!
//! Components:
//!
//! - [`StockLedger`]: authoritative per-product stock counters; the single
//!   synchronization point for all stock mutation
//! - [`CartStore`]: per-shopper carts validated against the ledger
//! - [`PricingResolver`]: live-price totals, deterministic and read-only
//! - [`OrderStore`]: durable orders, written only by checkout
//! - [`CheckoutCoordinator`]: the atomic cart-to-order conversion
//! - [`Storefront`]: configuration and wiring, plus the typed API surface
//!   the web layer calls
//!
//! # Example
//!
//! ```rust
//! use swiftcart_commerce::prelude::*;
//! use swiftcart_engine::{Storefront, StorefrontConfig};
//!
//! let store = Storefront::new(StorefrontConfig::default());
//! store.ledger().add_product(
//!     Product::new(ProductId::new("p1"), "SKU-1", "Widget", Money::new(1000, Currency::USD)),
//!     5,
//! );
//!
//! let shopper = ShopperId::new("shopper-1");
//! store.add_to_cart(&shopper, &ProductId::new("p1"), 3).unwrap();
//! let receipt = store.checkout(&shopper).unwrap();
//! assert_eq!(receipt.total.amount, 3000);
//! ```

pub mod api;
pub mod cart_store;
pub mod checkout;
pub mod ledger;
pub mod order_store;
pub mod pricing;
pub mod storefront;

pub use cart_store::{AddOutcome, CartStore};
pub use checkout::{CheckoutCoordinator, CheckoutReceipt};
pub use ledger::{ProductSnapshot, StockLedger};
pub use order_store::{InMemoryOrderStore, OrderStore};
pub use pricing::PricingResolver;
pub use storefront::{Storefront, StorefrontConfig};
