//! Live-price totals for cart display.
//!
//! Totals are always recomputed from the ledger's current prices; the
//! add-time price snapshot on a cart line is historical data only. Line
//! subtotals are exact in the currency's minor unit, so summing them
//! introduces no cross-line rounding drift.

use std::sync::Arc;

use swiftcart_commerce::cart::{CartItem, CartTotals, LineTotals};
use swiftcart_commerce::money::{Currency, Money};
use swiftcart_commerce::CommerceError;

use crate::ledger::StockLedger;

/// Recomputes line and cart totals from current catalog prices.
///
/// Deterministic and side-effect-free: the same lines against the same
/// ledger prices and fees always produce the same totals.
pub struct PricingResolver {
    ledger: Arc<StockLedger>,
    currency: Currency,
}

impl PricingResolver {
    /// Create a resolver reading prices from the given ledger.
    pub fn new(ledger: Arc<StockLedger>, currency: Currency) -> Self {
        Self { ledger, currency }
    }

    /// Compute the full pricing breakdown for a set of cart lines.
    ///
    /// `fees` is whatever the external fee supplier hands in; it is added
    /// on top of the subtotal without interpretation.
    pub fn totals(&self, items: &[CartItem], fees: Money) -> Result<CartTotals, CommerceError> {
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let snapshot = self
                .ledger
                .product(&item.product_id)?
                .ok_or_else(|| CommerceError::ProductNotFound(item.product_id.to_string()))?;
            let subtotal = snapshot.price.try_multiply(item.quantity)?;
            lines.push(LineTotals {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price: snapshot.price,
                subtotal,
            });
        }

        let subtotal = Money::try_sum(lines.iter().map(|l| &l.subtotal), self.currency)?;
        let total = subtotal.try_add(&fees)?;
        Ok(CartTotals {
            subtotal,
            fee_total: fees,
            total,
            lines,
        })
    }
}
