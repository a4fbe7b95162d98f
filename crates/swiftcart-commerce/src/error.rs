//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart and checkout operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Malformed quantity (zero or negative where a positive count is required).
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Malformed input that is neither a quantity nor an identifier problem.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Product not found (or no longer listed).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The referenced cart line does not exist for this shopper.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Order not found for this shopper.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Product has zero available stock.
    #[error("Out of stock: {0}")]
    OutOfStock(String),

    /// Requested quantity exceeds what is currently available.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// Checkout attempted on a cart with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// A checkout for this shopper is already in flight.
    #[error("Checkout already in progress for {0}")]
    CheckoutInProgress(String),

    /// Requested order status change is not a legal transition.
    #[error("Invalid order transition from {from} to {to}")]
    InvalidOrderTransition { from: String, to: String },

    /// Money values in different currencies were combined.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow in a money calculation.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Infrastructure fault in a backing store.
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl CommerceError {
    /// Whether retrying the same operation unchanged can succeed.
    ///
    /// Stock rejections clear up when inventory moves; storage faults are
    /// safe to retry because every multi-step operation is all-or-nothing.
    /// Caller faults (validation, not-found) are not retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CommerceError::OutOfStock(_)
                | CommerceError::InsufficientStock { .. }
                | CommerceError::CheckoutInProgress(_)
                | CommerceError::StorageFailure(_)
        )
    }

    /// Stable machine-readable code for the API boundary.
    pub fn code(&self) -> &'static str {
        match self {
            CommerceError::InvalidQuantity(_) | CommerceError::Validation(_) => "validation_error",
            CommerceError::ProductNotFound(_)
            | CommerceError::ItemNotInCart(_)
            | CommerceError::OrderNotFound(_) => "not_found",
            CommerceError::OutOfStock(_) => "out_of_stock",
            CommerceError::InsufficientStock { .. } => "insufficient_stock",
            CommerceError::EmptyCart => "empty_cart",
            CommerceError::CheckoutInProgress(_) => "checkout_in_progress",
            CommerceError::InvalidOrderTransition { .. } => "invalid_order_transition",
            CommerceError::CurrencyMismatch { .. } | CommerceError::Overflow => "pricing_error",
            CommerceError::StorageFailure(_) => "storage_failure",
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::StorageFailure(e.to_string())
    }
}
