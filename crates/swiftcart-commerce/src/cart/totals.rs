//! Derived cart pricing.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for one cart line at current catalog prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineTotals {
    /// Product the line refers to.
    pub product_id: ProductId,
    /// Quantity.
    pub quantity: i64,
    /// Current unit price (not the add-time snapshot).
    pub unit_price: Money,
    /// Exact line subtotal in minor units (unit price x quantity).
    pub subtotal: Money,
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartTotals {
    /// Sum of line subtotals.
    pub subtotal: Money,
    /// Externally supplied fees.
    pub fee_total: Money,
    /// Subtotal plus fees.
    pub total: Money,
    /// Per-line breakdown, in cart order.
    pub lines: Vec<LineTotals>,
}

impl CartTotals {
    /// Totals of an empty cart.
    pub fn empty(currency: crate::money::Currency) -> Self {
        Self {
            subtotal: Money::zero(currency),
            fee_total: Money::zero(currency),
            total: Money::zero(currency),
            lines: Vec::new(),
        }
    }

    /// Whether any fees apply.
    pub fn has_fees(&self) -> bool {
        !self.fee_total.is_zero()
    }
}
