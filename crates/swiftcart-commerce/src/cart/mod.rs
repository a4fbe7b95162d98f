//! Shopping cart module.
//!
//! A cart is a shopper's in-progress, not-yet-committed selection of
//! products and quantities. Totals are derived, never stored.

mod cart;
mod totals;

pub use cart::{Cart, CartItem};
pub use totals::{CartTotals, LineTotals};
