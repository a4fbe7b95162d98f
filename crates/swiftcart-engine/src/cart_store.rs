//! Per-shopper cart storage.
//!
//! Carts are keyed by the authenticated shopper identifier, and every
//! operation takes that identifier explicitly. Isolation between shoppers
//! is structural: there is no way to reach a cart except through its
//! owner's key.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use swiftcart_commerce::cart::Cart;
use swiftcart_commerce::{CommerceError, ProductId, ShopperId};
use tracing::debug;

use crate::ledger::StockLedger;

/// Result of an add-to-cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// The line's quantity after the add.
    pub line_quantity: i64,
    /// Whether the requested quantity was capped at available stock.
    pub clamped: bool,
}

/// Owns every shopper's cart and validates mutations against live stock.
pub struct CartStore {
    carts: RwLock<HashMap<ShopperId, Cart>>,
    ledger: Arc<StockLedger>,
}

impl CartStore {
    /// Create a cart store reading availability from the given ledger.
    pub fn new(ledger: Arc<StockLedger>) -> Self {
        Self {
            carts: RwLock::new(HashMap::new()),
            ledger,
        }
    }

    /// Add `quantity` units of a product to the shopper's cart.
    ///
    /// Quantities sum with any existing line, capped at available stock.
    /// The quantity-control UI enforces the cap client-side; this is the
    /// server-side re-check. Fails with `OutOfStock` only when nothing is
    /// available at all.
    pub fn add_item(
        &self,
        shopper: &ShopperId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<AddOutcome, CommerceError> {
        if quantity < 1 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let snapshot = self
            .ledger
            .product(product_id)?
            .filter(|s| s.active)
            .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string()))?;
        if snapshot.available <= 0 {
            return Err(CommerceError::OutOfStock(product_id.to_string()));
        }

        let mut carts = self.write()?;
        let cart = carts
            .entry(shopper.clone())
            .or_insert_with(|| Cart::new(shopper.clone()));

        let existing = cart.line(product_id).map(|l| l.quantity).unwrap_or(0);
        let requested_total = existing.saturating_add(quantity);
        let target = requested_total.min(snapshot.available);
        let clamped = target < requested_total;

        if existing > 0 {
            cart.set_quantity(product_id, target);
        } else {
            cart.upsert_item(product_id.clone(), target, snapshot.price);
        }
        debug!(shopper = %shopper, product = %product_id, quantity = target, clamped, "cart line updated");

        Ok(AddOutcome {
            line_quantity: target,
            clamped,
        })
    }

    /// Set a cart line to an exact quantity.
    ///
    /// Zero removes the line. Unlike `add_item` there is no clamp: the
    /// caller asked for a precise value, so exceeding available stock is
    /// an error.
    pub fn update_quantity(
        &self,
        shopper: &ShopperId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        if quantity < 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if quantity == 0 {
            return self.remove_item(shopper, product_id);
        }

        let available = self.ledger.available(product_id)?;

        let mut carts = self.write()?;
        let cart = carts
            .get_mut(shopper)
            .ok_or_else(|| CommerceError::ItemNotInCart(product_id.to_string()))?;
        if cart.line(product_id).is_none() {
            return Err(CommerceError::ItemNotInCart(product_id.to_string()));
        }
        if quantity > available {
            return Err(CommerceError::InsufficientStock {
                product_id: product_id.to_string(),
                requested: quantity,
                available,
            });
        }
        cart.set_quantity(product_id, quantity);
        Ok(())
    }

    /// Remove a line from the shopper's cart. Idempotent: removing an
    /// absent line succeeds and changes nothing.
    pub fn remove_item(
        &self,
        shopper: &ShopperId,
        product_id: &ProductId,
    ) -> Result<(), CommerceError> {
        let mut carts = self.write()?;
        if let Some(cart) = carts.get_mut(shopper) {
            cart.remove_line(product_id);
        }
        Ok(())
    }

    /// Snapshot of the shopper's cart; `None` if no cart exists yet.
    pub fn snapshot(&self, shopper: &ShopperId) -> Result<Option<Cart>, CommerceError> {
        let carts = self.read()?;
        Ok(carts.get(shopper).cloned())
    }

    /// Sum of line quantities, for badge display.
    pub fn item_count(&self, shopper: &ShopperId) -> Result<i64, CommerceError> {
        let carts = self.read()?;
        Ok(carts.get(shopper).map(|c| c.item_count()).unwrap_or(0))
    }

    /// Empty the shopper's cart.
    pub fn clear(&self, shopper: &ShopperId) -> Result<(), CommerceError> {
        let mut carts = self.write()?;
        if let Some(cart) = carts.get_mut(shopper) {
            cart.clear();
        }
        Ok(())
    }

    /// Fold one shopper's cart into another's (guest cart claimed at
    /// sign-in), clamping each merged line to available stock.
    pub fn merge_carts(&self, from: &ShopperId, into: &ShopperId) -> Result<(), CommerceError> {
        let mut carts = self.write()?;
        let Some(source) = carts.remove(from) else {
            return Ok(());
        };
        let target = carts
            .entry(into.clone())
            .or_insert_with(|| Cart::new(into.clone()));
        target.merge(source);

        let lines: Vec<(ProductId, i64)> = target
            .items
            .iter()
            .map(|l| (l.product_id.clone(), l.quantity))
            .collect();
        drop(carts);

        for (product_id, quantity) in lines {
            let available = self.ledger.available(&product_id).unwrap_or(0);
            if quantity > available {
                let mut carts = self.write()?;
                if let Some(cart) = carts.get_mut(into) {
                    cart.set_quantity(&product_id, available.max(0));
                }
            }
        }
        Ok(())
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<ShopperId, Cart>>, CommerceError> {
        self.carts
            .read()
            .map_err(|_| CommerceError::StorageFailure("cart store lock poisoned".into()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<ShopperId, Cart>>, CommerceError> {
        self.carts
            .write()
            .map_err(|_| CommerceError::StorageFailure("cart store lock poisoned".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiftcart_commerce::catalog::Product;
    use swiftcart_commerce::money::{Currency, Money};

    fn store_with(id: &str, stock: i64) -> CartStore {
        let ledger = Arc::new(StockLedger::new());
        ledger.add_product(
            Product::new(
                ProductId::new(id),
                format!("SKU-{id}"),
                format!("Product {id}"),
                Money::new(1000, Currency::USD),
            ),
            stock,
        );
        CartStore::new(ledger)
    }

    fn shopper() -> ShopperId {
        ShopperId::new("s1")
    }

    #[test]
    fn test_add_item_creates_line() {
        let store = store_with("p1", 5);
        let outcome = store.add_item(&shopper(), &ProductId::new("p1"), 3).unwrap();
        assert_eq!(outcome.line_quantity, 3);
        assert!(!outcome.clamped);
        assert_eq!(store.item_count(&shopper()).unwrap(), 3);
    }

    #[test]
    fn test_add_item_sums_and_clamps() {
        let store = store_with("p1", 5);
        let p = ProductId::new("p1");
        store.add_item(&shopper(), &p, 3).unwrap();
        let outcome = store.add_item(&shopper(), &p, 4).unwrap();
        assert_eq!(outcome.line_quantity, 5);
        assert!(outcome.clamped);
    }

    #[test]
    fn test_add_item_zero_stock_is_out_of_stock() {
        let store = store_with("p1", 0);
        let err = store.add_item(&shopper(), &ProductId::new("p1"), 1).unwrap_err();
        assert!(matches!(err, CommerceError::OutOfStock(_)));
    }

    #[test]
    fn test_add_item_rejects_bad_quantity() {
        let store = store_with("p1", 5);
        assert!(matches!(
            store.add_item(&shopper(), &ProductId::new("p1"), 0),
            Err(CommerceError::InvalidQuantity(0))
        ));
    }

    #[test]
    fn test_add_inactive_product_is_not_found() {
        let store = store_with("p1", 5);
        store.ledger.set_active(&ProductId::new("p1"), false).unwrap();
        assert!(matches!(
            store.add_item(&shopper(), &ProductId::new("p1"), 1),
            Err(CommerceError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_update_quantity_is_precise() {
        let store = store_with("p1", 5);
        let p = ProductId::new("p1");
        store.add_item(&shopper(), &p, 3).unwrap();

        let err = store.update_quantity(&shopper(), &p, 6).unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InsufficientStock {
                requested: 6,
                available: 5,
                ..
            }
        ));
        // The rejected update leaves the line untouched.
        assert_eq!(store.item_count(&shopper()).unwrap(), 3);

        store.update_quantity(&shopper(), &p, 5).unwrap();
        assert_eq!(store.item_count(&shopper()).unwrap(), 5);
    }

    #[test]
    fn test_update_missing_line_is_not_in_cart() {
        let store = store_with("p1", 5);
        assert!(matches!(
            store.update_quantity(&shopper(), &ProductId::new("p1"), 2),
            Err(CommerceError::ItemNotInCart(_))
        ));
    }

    #[test]
    fn test_update_to_zero_removes() {
        let store = store_with("p1", 5);
        let p = ProductId::new("p1");
        store.add_item(&shopper(), &p, 3).unwrap();
        store.update_quantity(&shopper(), &p, 0).unwrap();
        assert_eq!(store.item_count(&shopper()).unwrap(), 0);
    }

    #[test]
    fn test_remove_item_idempotent() {
        let store = store_with("p1", 5);
        let p = ProductId::new("p1");
        store.remove_item(&shopper(), &p).unwrap();
        store.add_item(&shopper(), &p, 2).unwrap();
        store.remove_item(&shopper(), &p).unwrap();
        store.remove_item(&shopper(), &p).unwrap();
        assert_eq!(store.item_count(&shopper()).unwrap(), 0);
    }

    #[test]
    fn test_shoppers_are_isolated() {
        let store = store_with("p1", 5);
        let p = ProductId::new("p1");
        let alice = ShopperId::new("alice");
        let bob = ShopperId::new("bob");

        store.add_item(&alice, &p, 2).unwrap();
        assert_eq!(store.item_count(&bob).unwrap(), 0);

        store.remove_item(&bob, &p).unwrap();
        assert_eq!(store.item_count(&alice).unwrap(), 2);
    }

    #[test]
    fn test_merge_carts_clamps_to_stock() {
        let store = store_with("p1", 4);
        let p = ProductId::new("p1");
        let guest = ShopperId::new("guest");
        let account = ShopperId::new("account");

        store.add_item(&guest, &p, 3).unwrap();
        store.add_item(&account, &p, 3).unwrap();
        store.merge_carts(&guest, &account).unwrap();

        assert_eq!(store.item_count(&account).unwrap(), 4);
        assert!(store.snapshot(&guest).unwrap().map(|c| c.is_empty()).unwrap_or(true));
    }
}
