//! Stock ledger: authoritative per-product availability.
//!
//! Every stock mutation in the engine funnels through this type. `reserve`
//! is an atomic conditional decrement: the check and the decrement happen
//! under one lock, so there is no read-then-write window for two checkouts
//! to both claim the last unit.

use std::collections::HashMap;
use std::sync::Mutex;

use swiftcart_commerce::catalog::{Product, StockLevel};
use swiftcart_commerce::money::Money;
use swiftcart_commerce::{CommerceError, ProductId};
use tracing::{debug, warn};

/// Point-in-time read of one product's sellable state.
///
/// This is the read path handed to the cart store and pricing resolver;
/// it matches the catalog collaborator contract (price, availability,
/// active flag).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub available: i64,
    pub active: bool,
}

struct LedgerRow {
    product: Product,
    stock: StockLevel,
}

/// Authoritative per-product stock counters.
///
/// A single lock over the row map makes every operation atomic relative
/// to every other; per-product contention is the only contention in the
/// system, and no operation holds the lock across I/O.
pub struct StockLedger {
    rows: Mutex<HashMap<ProductId, LedgerRow>>,
}

impl StockLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }

    /// Add a product with its initial stock, replacing any existing row.
    pub fn add_product(&self, product: Product, initial_stock: i64) {
        let mut rows = match self.rows.lock() {
            Ok(rows) => rows,
            Err(poisoned) => poisoned.into_inner(),
        };
        rows.insert(
            product.id.clone(),
            LedgerRow {
                product,
                stock: StockLevel::new(initial_stock),
            },
        );
    }

    /// Read one product's current sellable state.
    pub fn product(&self, id: &ProductId) -> Result<Option<ProductSnapshot>, CommerceError> {
        let rows = self.lock()?;
        Ok(rows.get(id).map(|row| ProductSnapshot {
            id: row.product.id.clone(),
            name: row.product.name.clone(),
            price: row.product.price,
            available: row.stock.available(),
            active: row.product.active,
        }))
    }

    /// Currently available quantity for a product.
    pub fn available(&self, id: &ProductId) -> Result<i64, CommerceError> {
        let rows = self.lock()?;
        rows.get(id)
            .map(|row| row.stock.available())
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// Atomically hold `quantity` units of a product.
    ///
    /// Fails with `InsufficientStock` without side effects unless the
    /// post-reserve available quantity stays non-negative.
    pub fn reserve(&self, id: &ProductId, quantity: i64) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let mut rows = self.lock()?;
        let row = rows
            .get_mut(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;

        if !row.stock.reserve(quantity) {
            let available = row.stock.available();
            warn!(product = %id, requested = quantity, available, "reservation rejected");
            return Err(CommerceError::InsufficientStock {
                product_id: id.to_string(),
                requested: quantity,
                available,
            });
        }
        debug!(product = %id, quantity, "stock reserved");
        Ok(())
    }

    /// Return reserved units to availability (compensating action).
    ///
    /// A missing row is a no-op: release is called on compensation paths
    /// and must never introduce a new failure.
    pub fn release(&self, id: &ProductId, quantity: i64) {
        let mut rows = match self.rows.lock() {
            Ok(rows) => rows,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(row) = rows.get_mut(id) {
            row.stock.release(quantity);
            debug!(product = %id, quantity, "reservation released");
        }
    }

    /// Convert a reservation into a permanent stock decrement.
    pub fn commit(&self, id: &ProductId, quantity: i64) {
        let mut rows = match self.rows.lock() {
            Ok(rows) => rows,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(row) = rows.get_mut(id) {
            row.stock.commit(quantity);
            debug!(product = %id, quantity, "reservation committed");
        }
    }

    /// Return units to on-hand stock (restock or cancelled order).
    pub fn restock(&self, id: &ProductId, quantity: i64) -> Result<(), CommerceError> {
        let mut rows = self.lock()?;
        let row = rows
            .get_mut(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;
        row.stock.restock(quantity);
        Ok(())
    }

    /// Change a product's listed price.
    pub fn set_price(&self, id: &ProductId, price: Money) -> Result<(), CommerceError> {
        let mut rows = self.lock()?;
        let row = rows
            .get_mut(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;
        row.product.price = price;
        Ok(())
    }

    /// List or delist a product.
    pub fn set_active(&self, id: &ProductId, active: bool) -> Result<(), CommerceError> {
        let mut rows = self.lock()?;
        let row = rows
            .get_mut(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;
        row.product.active = active;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<ProductId, LedgerRow>>, CommerceError> {
        self.rows
            .lock()
            .map_err(|_| CommerceError::StorageFailure("stock ledger lock poisoned".into()))
    }
}

impl Default for StockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use swiftcart_commerce::money::Currency;

    fn ledger_with(id: &str, stock: i64) -> StockLedger {
        let ledger = StockLedger::new();
        ledger.add_product(
            Product::new(
                ProductId::new(id),
                format!("SKU-{id}"),
                format!("Product {id}"),
                Money::new(1000, Currency::USD),
            ),
            stock,
        );
        ledger
    }

    #[test]
    fn test_reserve_then_available() {
        let ledger = ledger_with("p1", 10);
        ledger.reserve(&ProductId::new("p1"), 4).unwrap();
        assert_eq!(ledger.available(&ProductId::new("p1")).unwrap(), 6);
    }

    #[test]
    fn test_reserve_insufficient_is_side_effect_free() {
        let ledger = ledger_with("p1", 2);
        let err = ledger.reserve(&ProductId::new("p1"), 3).unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InsufficientStock {
                requested: 3,
                available: 2,
                ..
            }
        ));
        assert_eq!(ledger.available(&ProductId::new("p1")).unwrap(), 2);
    }

    #[test]
    fn test_reserve_unknown_product() {
        let ledger = StockLedger::new();
        assert!(matches!(
            ledger.reserve(&ProductId::new("ghost"), 1),
            Err(CommerceError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_release_restores_availability() {
        let ledger = ledger_with("p1", 5);
        let id = ProductId::new("p1");
        ledger.reserve(&id, 5).unwrap();
        assert_eq!(ledger.available(&id).unwrap(), 0);
        ledger.release(&id, 5);
        assert_eq!(ledger.available(&id).unwrap(), 5);
    }

    #[test]
    fn test_commit_makes_decrement_permanent() {
        let ledger = ledger_with("p1", 5);
        let id = ProductId::new("p1");
        ledger.reserve(&id, 3).unwrap();
        ledger.commit(&id, 3);
        assert_eq!(ledger.available(&id).unwrap(), 2);
        // Releasing after commit must not resurrect the sold units.
        ledger.release(&id, 3);
        assert_eq!(ledger.available(&id).unwrap(), 2);
    }

    #[test]
    fn test_snapshot_reflects_price_change() {
        let ledger = ledger_with("p1", 5);
        let id = ProductId::new("p1");
        ledger.set_price(&id, Money::new(1250, Currency::USD)).unwrap();
        let snap = ledger.product(&id).unwrap().unwrap();
        assert_eq!(snap.price.amount, 1250);
        assert_eq!(snap.available, 5);
    }

    #[test]
    fn test_threads_race_for_last_unit() {
        let ledger = Arc::new(ledger_with("p1", 1));
        let id = ProductId::new("p1");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                let id = id.clone();
                std::thread::spawn(move || ledger.reserve(&id, 1).is_ok())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap_or(false))
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(ledger.available(&id).unwrap(), 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Reserve(i64),
            Release(i64),
            Commit(i64),
            Restock(i64),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (1i64..20).prop_map(Op::Reserve),
                (0i64..20).prop_map(Op::Release),
                (0i64..20).prop_map(Op::Commit),
                (0i64..20).prop_map(Op::Restock),
            ]
        }

        proptest! {
            /// Available quantity stays non-negative under any
            /// interleaving of ledger operations.
            #[test]
            fn prop_available_never_negative(
                initial in 0i64..50,
                ops in prop::collection::vec(op_strategy(), 0..64),
            ) {
                let ledger = ledger_with("p1", initial);
                let id = ProductId::new("p1");
                for op in ops {
                    match op {
                        Op::Reserve(n) => {
                            let _ = ledger.reserve(&id, n);
                        }
                        Op::Release(n) => ledger.release(&id, n),
                        Op::Commit(n) => ledger.commit(&id, n),
                        Op::Restock(n) => {
                            let _ = ledger.restock(&id, n);
                        }
                    }
                    prop_assert!(ledger.available(&id).unwrap() >= 0);
                }
            }
        }
    }
}
