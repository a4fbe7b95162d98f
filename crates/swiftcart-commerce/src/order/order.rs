//! Order types.

use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, ShopperId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created at checkout, awaiting payment capture.
    #[default]
    PendingPayment,
    /// Payment captured.
    Paid,
    /// Payment attempt failed; stock stays committed until cancellation.
    Failed,
    /// Order cancelled; stock has been returned.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a transition to `next` is legal.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (
                OrderStatus::PendingPayment,
                OrderStatus::Paid | OrderStatus::Failed | OrderStatus::Cancelled
            ) | (OrderStatus::Failed, OrderStatus::Paid | OrderStatus::Cancelled)
        )
    }

    /// Whether the order can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        self.can_transition_to(OrderStatus::Cancelled)
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }
}

/// A line in an order.
///
/// The unit price is captured at checkout time and never changes,
/// regardless of later catalog price moves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Product ordered.
    pub product_id: ProductId,
    /// Product name at checkout time.
    pub name: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Unit price at checkout time.
    pub unit_price: Money,
    /// Line total (unit price x quantity).
    pub line_total: Money,
}

impl OrderItem {
    /// Build a line, computing its total with overflow checks.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
    ) -> Result<Self, CommerceError> {
        let line_total = unit_price.try_multiply(quantity)?;
        Ok(Self {
            product_id,
            name: name.into(),
            quantity,
            unit_price,
            line_total,
        })
    }
}

/// A durable order produced by checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Shopper the order belongs to.
    pub shopper_id: ShopperId,
    /// Ordered lines; immutable after creation.
    pub items: Vec<OrderItem>,
    /// Fees charged on top of the line subtotals.
    pub fee_total: Money,
    /// Grand total charged (line subtotals plus fees).
    pub total: Money,
    /// Current status.
    pub status: OrderStatus,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last status change.
    pub updated_at: i64,
}

impl Order {
    /// Create a pending-payment order, deriving the total from its lines
    /// plus the externally supplied fees.
    pub fn new(
        shopper_id: ShopperId,
        items: Vec<OrderItem>,
        fee_total: Money,
        currency: Currency,
    ) -> Result<Self, CommerceError> {
        let subtotal = Money::try_sum(items.iter().map(|i| &i.line_total), currency)?;
        let total = subtotal.try_add(&fee_total)?;
        let now = current_timestamp();
        Ok(Self {
            id: OrderId::generate(),
            shopper_id,
            items,
            fee_total,
            total,
            status: OrderStatus::PendingPayment,
            created_at: now,
            updated_at: now,
        })
    }

    /// Total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Move to a new status, rejecting illegal transitions.
    pub fn transition(&mut self, next: OrderStatus) -> Result<(), CommerceError> {
        if !self.status.can_transition_to(next) {
            return Err(CommerceError::InvalidOrderTransition {
                from: self.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.status = next;
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Record a successful payment capture.
    pub fn mark_paid(&mut self) -> Result<(), CommerceError> {
        self.transition(OrderStatus::Paid)
    }

    /// Record a failed payment attempt.
    pub fn mark_failed(&mut self) -> Result<(), CommerceError> {
        self.transition(OrderStatus::Failed)
    }

    /// Cancel the order.
    pub fn cancel(&mut self) -> Result<(), CommerceError> {
        self.transition(OrderStatus::Cancelled)
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
