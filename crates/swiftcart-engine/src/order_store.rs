//! Durable order storage.
//!
//! The store is a trait seam: checkout writes through it, tests inject
//! faulty implementations to exercise the compensation path, and a real
//! deployment can substitute a database-backed store.

use std::sync::RwLock;

use swiftcart_commerce::order::{Order, OrderStatus};
use swiftcart_commerce::{CommerceError, OrderId, ShopperId};

/// Storage contract for completed orders.
///
/// Implementations must make `insert` atomic: either the order and all
/// its items are durably recorded, or nothing is.
pub trait OrderStore: Send + Sync {
    /// Persist a new order.
    fn insert(&self, order: Order) -> Result<(), CommerceError>;

    /// Fetch an order by id.
    fn get(&self, id: &OrderId) -> Result<Option<Order>, CommerceError>;

    /// All orders for a shopper, oldest first.
    fn orders_for_shopper(&self, shopper: &ShopperId) -> Result<Vec<Order>, CommerceError>;

    /// Apply a status transition, returning the updated order.
    fn transition(&self, id: &OrderId, next: OrderStatus) -> Result<Order, CommerceError>;
}

/// In-memory order store.
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored orders.
    pub fn len(&self) -> usize {
        self.orders.read().map(|o| o.len()).unwrap_or(0)
    }

    /// Whether no orders have been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn insert(&self, order: Order) -> Result<(), CommerceError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| CommerceError::StorageFailure("order store lock poisoned".into()))?;
        orders.push(order);
        Ok(())
    }

    fn get(&self, id: &OrderId) -> Result<Option<Order>, CommerceError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| CommerceError::StorageFailure("order store lock poisoned".into()))?;
        Ok(orders.iter().find(|o| &o.id == id).cloned())
    }

    fn orders_for_shopper(&self, shopper: &ShopperId) -> Result<Vec<Order>, CommerceError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| CommerceError::StorageFailure("order store lock poisoned".into()))?;
        Ok(orders
            .iter()
            .filter(|o| &o.shopper_id == shopper)
            .cloned()
            .collect())
    }

    fn transition(&self, id: &OrderId, next: OrderStatus) -> Result<Order, CommerceError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| CommerceError::StorageFailure("order store lock poisoned".into()))?;
        let order = orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))?;
        order.transition(next)?;
        Ok(order.clone())
    }
}
