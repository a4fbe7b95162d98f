//! Checkout coordinator: the atomic cart-to-order conversion.
//!
//! Checkout is a saga. The forward action is `reserve`, the compensating
//! action is `release`, and compensation runs in reverse order on any
//! downstream failure. The observable outcomes are exactly "nothing
//! happened" or "fully happened": stock is never left decremented without
//! a committed order, and no order is ever written without its stock.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use swiftcart_commerce::cart::CartItem;
use swiftcart_commerce::money::{Currency, Money};
use swiftcart_commerce::order::{Order, OrderItem, OrderStatus};
use swiftcart_commerce::{CommerceError, OrderId, ProductId, ShopperId};
use tracing::{debug, info, warn};

use crate::cart_store::CartStore;
use crate::ledger::StockLedger;
use crate::order_store::OrderStore;

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    /// The newly created order.
    pub order_id: OrderId,
    /// Amount charged.
    pub total: Money,
}

/// Orchestrates validation, stock reservation, order materialization, and
/// cart clearing as one all-or-nothing unit.
pub struct CheckoutCoordinator {
    ledger: Arc<StockLedger>,
    carts: Arc<CartStore>,
    orders: Arc<dyn OrderStore>,
    currency: Currency,
    fee: Money,
    in_flight: Mutex<HashSet<ShopperId>>,
}

impl CheckoutCoordinator {
    pub fn new(
        ledger: Arc<StockLedger>,
        carts: Arc<CartStore>,
        orders: Arc<dyn OrderStore>,
        currency: Currency,
        fee: Money,
    ) -> Self {
        Self {
            ledger,
            carts,
            orders,
            currency,
            fee,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Convert the shopper's cart into a durable order.
    ///
    /// On success the cart is empty and the order's stock is committed.
    /// On any failure every reservation made by this call has been
    /// released before the error is returned.
    pub fn checkout(&self, shopper: &ShopperId) -> Result<CheckoutReceipt, CommerceError> {
        let _guard = self.begin(shopper)?;

        let cart = self
            .carts
            .snapshot(shopper)?
            .filter(|c| !c.is_empty())
            .ok_or(CommerceError::EmptyCart)?;

        // Stable reservation order across concurrent checkouts sharing
        // products: ascending product id.
        let mut lines = cart.items.clone();
        lines.sort_by(|a, b| a.product_id.cmp(&b.product_id));

        let mut reserved: Vec<(ProductId, i64)> = Vec::with_capacity(lines.len());
        for line in &lines {
            match self.ledger.reserve(&line.product_id, line.quantity) {
                Ok(()) => reserved.push((line.product_id.clone(), line.quantity)),
                Err(err) => {
                    warn!(shopper = %shopper, product = %line.product_id, "checkout aborted during reservation");
                    self.release_all(&reserved);
                    return Err(err);
                }
            }
        }

        // Prices are resolved now, not at add time: the catalog may have
        // moved since the line was created.
        let order = match self.materialize(shopper, &lines) {
            Ok(order) => order,
            Err(err) => {
                self.release_all(&reserved);
                return Err(err);
            }
        };
        let receipt = CheckoutReceipt {
            order_id: order.id.clone(),
            total: order.total,
        };

        if let Err(err) = self.orders.insert(order) {
            warn!(shopper = %shopper, error = %err, "order write failed, releasing reservations");
            self.release_all(&reserved);
            return Err(err);
        }

        for (product_id, quantity) in &reserved {
            self.ledger.commit(product_id, *quantity);
        }
        if let Err(err) = self.carts.clear(shopper) {
            // The order is already durable; a failed clear is not a
            // reason to report the checkout as failed.
            warn!(shopper = %shopper, error = %err, "cart clear failed after commit");
        }

        info!(shopper = %shopper, order = %receipt.order_id, total = %receipt.total, "checkout complete");
        Ok(receipt)
    }

    /// Cancel an order and return its units to stock.
    ///
    /// Only the owning shopper can cancel, and only from a cancellable
    /// status; the order's recorded prices are untouched.
    pub fn cancel_order(
        &self,
        shopper: &ShopperId,
        order_id: &OrderId,
    ) -> Result<Order, CommerceError> {
        self.owned_order(shopper, order_id)?;
        let order = self.orders.transition(order_id, OrderStatus::Cancelled)?;
        for item in &order.items {
            if let Err(err) = self.ledger.restock(&item.product_id, item.quantity) {
                // A delisted row should not block the rest of the
                // cancellation from restocking.
                warn!(order = %order_id, product = %item.product_id, error = %err, "restock skipped");
            }
        }
        info!(shopper = %shopper, order = %order_id, "order cancelled and restocked");
        Ok(order)
    }

    /// Record the external payment capability's success.
    pub fn mark_paid(
        &self,
        shopper: &ShopperId,
        order_id: &OrderId,
    ) -> Result<Order, CommerceError> {
        self.owned_order(shopper, order_id)?;
        self.orders.transition(order_id, OrderStatus::Paid)
    }

    /// Record the external payment capability's failure. Stock stays
    /// committed; only an explicit cancellation returns it.
    pub fn mark_failed(
        &self,
        shopper: &ShopperId,
        order_id: &OrderId,
    ) -> Result<Order, CommerceError> {
        self.owned_order(shopper, order_id)?;
        self.orders.transition(order_id, OrderStatus::Failed)
    }

    fn materialize(
        &self,
        shopper: &ShopperId,
        lines: &[CartItem],
    ) -> Result<Order, CommerceError> {
        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let snapshot = self
                .ledger
                .product(&line.product_id)?
                .ok_or_else(|| CommerceError::ProductNotFound(line.product_id.to_string()))?;
            items.push(OrderItem::new(
                line.product_id.clone(),
                snapshot.name,
                line.quantity,
                snapshot.price,
            )?);
        }
        Order::new(shopper.clone(), items, self.fee, self.currency)
    }

    fn release_all(&self, reserved: &[(ProductId, i64)]) {
        for (product_id, quantity) in reserved.iter().rev() {
            self.ledger.release(product_id, *quantity);
        }
        debug!(reservations = reserved.len(), "compensation complete");
    }

    fn owned_order(&self, shopper: &ShopperId, order_id: &OrderId) -> Result<(), CommerceError> {
        let order = self
            .orders
            .get(order_id)?
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;
        // Another shopper's order id reads as absent, same as carts.
        if &order.shopper_id != shopper {
            return Err(CommerceError::OrderNotFound(order_id.to_string()));
        }
        Ok(())
    }

    fn begin(&self, shopper: &ShopperId) -> Result<CheckoutGuard<'_>, CommerceError> {
        let mut in_flight = self
            .in_flight
            .lock()
            .map_err(|_| CommerceError::StorageFailure("checkout guard lock poisoned".into()))?;
        if !in_flight.insert(shopper.clone()) {
            return Err(CommerceError::CheckoutInProgress(shopper.to_string()));
        }
        Ok(CheckoutGuard {
            in_flight: &self.in_flight,
            shopper: shopper.clone(),
        })
    }
}

/// Single-flight marker for one shopper's checkout; removed on drop so
/// the slot frees on every exit path, including early returns.
struct CheckoutGuard<'a> {
    in_flight: &'a Mutex<HashSet<ShopperId>>,
    shopper: ShopperId,
}

impl Drop for CheckoutGuard<'_> {
    fn drop(&mut self) {
        let mut in_flight = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        in_flight.remove(&self.shopper);
    }
}
