//! Product type.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// The engine treats products as read-only metadata: only the associated
/// stock level changes through cart and checkout activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Stock keeping unit.
    pub sku: String,
    /// Product name (denormalized into order lines at checkout).
    pub name: String,
    /// Current unit price.
    pub price: Money,
    /// Whether the product is listed for sale.
    pub active: bool,
    /// Unix timestamp of creation.
    pub created_at: i64,
}

impl Product {
    /// Create a new active product.
    pub fn new(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id,
            sku: sku.into(),
            name: name.into(),
            price,
            active: true,
            created_at: current_timestamp(),
        }
    }

    /// Delist the product. Existing cart lines and orders are unaffected.
    pub fn deactivate(&mut self) {
        self.active = false;
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
