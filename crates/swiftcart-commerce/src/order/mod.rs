//! Order module.
//!
//! Durable checkout results. An order's lines and prices never change
//! after creation; only its status moves, through checked transitions.

mod order;

pub use order::{Order, OrderItem, OrderStatus};
