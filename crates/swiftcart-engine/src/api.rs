//! Typed payloads for the web layer.
//!
//! The surrounding HTTP layer maps routes onto [`Storefront`] methods and
//! serializes these payloads; the engine itself never parses requests or
//! speaks HTTP. Errors cross the boundary as [`ErrorResponse`] values
//! with the stable codes from `CommerceError::code`.
//!
//! [`Storefront`]: crate::storefront::Storefront

use serde::{Deserialize, Serialize};
use swiftcart_commerce::cart::LineTotals;
use swiftcart_commerce::money::Money;
use swiftcart_commerce::order::OrderStatus;
use swiftcart_commerce::{CommerceError, OrderId};

/// Response to an add-to-cart request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddToCartResponse {
    /// The line's quantity after the add.
    pub line_quantity: i64,
    /// Whether the request was capped at available stock.
    pub clamped: bool,
    /// Total items now in the cart.
    pub item_count: i64,
    /// Cart grand total at current prices.
    pub cart_total: Money,
    /// Shopper-facing note, present when the quantity was capped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response to a quantity update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateItemResponse {
    /// Cart subtotal at current prices.
    pub subtotal: Money,
    /// Cart grand total at current prices.
    pub cart_total: Money,
}

/// Response to a line removal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoveItemResponse {
    /// Total items remaining in the cart.
    pub item_count: i64,
    /// Cart grand total at current prices.
    pub cart_total: Money,
}

/// Full cart view: lines plus derived totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartResponse {
    /// Per-line breakdown at current prices, in insertion order.
    pub lines: Vec<LineTotals>,
    /// Sum of line subtotals.
    pub subtotal: Money,
    /// Externally supplied fees.
    pub fee_total: Money,
    /// Subtotal plus fees.
    pub total: Money,
    /// Total items in the cart.
    pub item_count: i64,
}

/// Badge counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartCountResponse {
    /// Sum of line quantities.
    pub count: i64,
}

/// Response to a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutResponse {
    /// The created order.
    pub order_id: OrderId,
    /// Amount charged.
    pub total: Money,
}

/// Response to an order status operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderStatusResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub total: Money,
}

/// Error payload for the web layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Products involved in a stock rejection, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_ids: Vec<String>,
    /// Whether retrying the same request can succeed.
    pub retryable: bool,
}

impl From<&CommerceError> for ErrorResponse {
    fn from(err: &CommerceError) -> Self {
        let product_ids = match err {
            CommerceError::OutOfStock(id)
            | CommerceError::ProductNotFound(id)
            | CommerceError::ItemNotInCart(id) => vec![id.clone()],
            CommerceError::InsufficientStock { product_id, .. } => vec![product_id.clone()],
            _ => Vec::new(),
        };
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            product_ids,
            retryable: err.is_retryable(),
        }
    }
}
