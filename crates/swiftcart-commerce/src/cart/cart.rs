//! Cart and cart line types.

use crate::ids::{ProductId, ShopperId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A line in a shopper's cart.
///
/// Lines are unique per product within a cart. `price_at_add` is the
/// price the shopper saw when the line was created; it is informational
/// only, and live totals and order pricing always re-resolve the current
/// catalog price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Quantity, always >= 1 while the line exists.
    pub quantity: i64,
    /// Unit price snapshot taken when the line was first added.
    pub price_at_add: Money,
    /// Unix timestamp of the first add.
    pub added_at: i64,
}

/// A shopper's cart.
///
/// One cart per shopper, created lazily on the first add. Lines keep
/// insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Owning shopper.
    pub shopper_id: ShopperId,
    /// Lines in insertion order, at most one per product.
    pub items: Vec<CartItem>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create an empty cart for a shopper.
    pub fn new(shopper_id: ShopperId) -> Self {
        let now = current_timestamp();
        Self {
            shopper_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Get the line for a product, if present.
    pub fn line(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// Add `quantity` units of a product, creating the line on first add.
    ///
    /// Returns the resulting line quantity. The caller is responsible for
    /// validating the quantity against stock; this method only maintains
    /// the line structure.
    pub fn upsert_item(
        &mut self,
        product_id: ProductId,
        quantity: i64,
        price_at_add: Money,
    ) -> i64 {
        self.updated_at = current_timestamp();
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = item.quantity.saturating_add(quantity);
            return item.quantity;
        }
        self.items.push(CartItem {
            product_id,
            quantity,
            price_at_add,
            added_at: self.updated_at,
        });
        quantity
    }

    /// Set a line to an exact quantity.
    ///
    /// Returns `false` if no such line exists. A quantity of zero removes
    /// the line.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        if quantity == 0 {
            return self.remove_line(product_id);
        }
        if let Some(item) = self.items.iter_mut().find(|i| &i.product_id == product_id) {
            item.quantity = quantity;
            self.updated_at = current_timestamp();
            true
        } else {
            false
        }
    }

    /// Remove a line. Returns whether a line was actually removed.
    pub fn remove_line(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = current_timestamp();
    }

    /// Total item count (sum of line quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Fold another cart's lines into this one (guest cart claimed at
    /// sign-in). Quantities for shared products sum; the earlier
    /// `price_at_add` snapshot wins.
    pub fn merge(&mut self, other: Cart) {
        for item in other.items {
            self.upsert_item(item.product_id, item.quantity, item.price_at_add);
        }
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
