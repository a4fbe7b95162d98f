//! Storefront facade: configuration and wiring.
//!
//! One object for the web layer to hold. It owns the ledger, stores, and
//! coordinator, applies the configured per-line limit and flat fee, and
//! translates domain results into the payloads in [`crate::api`].

use std::sync::Arc;

use swiftcart_commerce::money::{Currency, Money};
use swiftcart_commerce::order::Order;
use swiftcart_commerce::{CommerceError, OrderId, ProductId, ShopperId};

use crate::api::{
    AddToCartResponse, CartCountResponse, CartResponse, CheckoutResponse, OrderStatusResponse,
    RemoveItemResponse, UpdateItemResponse,
};
use crate::cart_store::CartStore;
use crate::checkout::CheckoutCoordinator;
use crate::ledger::StockLedger;
use crate::order_store::{InMemoryOrderStore, OrderStore};
use crate::pricing::PricingResolver;

/// Upper bound on any single cart line, independent of stock.
pub const DEFAULT_MAX_QUANTITY_PER_LINE: i64 = 9999;

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Currency for all pricing.
    pub currency: Currency,
    /// Per-line quantity cap.
    pub max_quantity_per_line: i64,
    /// Flat fee in minor units, applied to every cart total. Stands in
    /// for the external fee supplier.
    pub flat_fee: i64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            max_quantity_per_line: DEFAULT_MAX_QUANTITY_PER_LINE,
            flat_fee: 0,
        }
    }
}

impl StorefrontConfig {
    /// Create a configuration for the given currency.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            ..Default::default()
        }
    }

    /// Set the per-line quantity cap.
    pub fn with_max_quantity_per_line(mut self, max: i64) -> Self {
        self.max_quantity_per_line = max;
        self
    }

    /// Set the flat fee in minor units.
    pub fn with_flat_fee(mut self, fee: i64) -> Self {
        self.flat_fee = fee;
        self
    }
}

/// The assembled engine.
pub struct Storefront {
    config: StorefrontConfig,
    ledger: Arc<StockLedger>,
    carts: Arc<CartStore>,
    orders: Arc<dyn OrderStore>,
    coordinator: CheckoutCoordinator,
    pricing: PricingResolver,
}

impl Storefront {
    /// Build a storefront with an in-memory order store.
    pub fn new(config: StorefrontConfig) -> Self {
        Self::with_order_store(config, Arc::new(InMemoryOrderStore::new()))
    }

    /// Build a storefront writing orders through the given store.
    pub fn with_order_store(config: StorefrontConfig, orders: Arc<dyn OrderStore>) -> Self {
        let ledger = Arc::new(StockLedger::new());
        let carts = Arc::new(CartStore::new(Arc::clone(&ledger)));
        let coordinator = CheckoutCoordinator::new(
            Arc::clone(&ledger),
            Arc::clone(&carts),
            Arc::clone(&orders),
            config.currency,
            Money::new(config.flat_fee, config.currency),
        );
        let pricing = PricingResolver::new(Arc::clone(&ledger), config.currency);
        Self {
            config,
            ledger,
            carts,
            orders,
            coordinator,
            pricing,
        }
    }

    /// The stock ledger, for catalog seeding and stock management.
    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    /// The active configuration.
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Add a product to the shopper's cart.
    pub fn add_to_cart(
        &self,
        shopper: &ShopperId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<AddToCartResponse, CommerceError> {
        self.check_line_limit(quantity)?;
        let outcome = self.carts.add_item(shopper, product_id, quantity)?;
        let totals = self.cart_totals(shopper)?;
        Ok(AddToCartResponse {
            line_quantity: outcome.line_quantity,
            clamped: outcome.clamped,
            item_count: self.carts.item_count(shopper)?,
            cart_total: totals.total,
            message: outcome
                .clamped
                .then(|| "quantity capped at available stock".to_string()),
        })
    }

    /// Set a cart line to an exact quantity (zero removes it).
    pub fn update_item(
        &self,
        shopper: &ShopperId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<UpdateItemResponse, CommerceError> {
        self.check_line_limit(quantity)?;
        self.carts.update_quantity(shopper, product_id, quantity)?;
        let totals = self.cart_totals(shopper)?;
        Ok(UpdateItemResponse {
            subtotal: totals.subtotal,
            cart_total: totals.total,
        })
    }

    /// Remove a cart line; succeeds even if the line is absent.
    pub fn remove_item(
        &self,
        shopper: &ShopperId,
        product_id: &ProductId,
    ) -> Result<RemoveItemResponse, CommerceError> {
        self.carts.remove_item(shopper, product_id)?;
        let totals = self.cart_totals(shopper)?;
        Ok(RemoveItemResponse {
            item_count: self.carts.item_count(shopper)?,
            cart_total: totals.total,
        })
    }

    /// The shopper's cart with derived totals. An absent cart reads as
    /// an empty one.
    pub fn cart(&self, shopper: &ShopperId) -> Result<CartResponse, CommerceError> {
        let totals = self.cart_totals(shopper)?;
        Ok(CartResponse {
            item_count: totals.lines.iter().map(|l| l.quantity).sum(),
            subtotal: totals.subtotal,
            fee_total: totals.fee_total,
            total: totals.total,
            lines: totals.lines,
        })
    }

    /// Badge counter; read-only.
    pub fn item_count(&self, shopper: &ShopperId) -> Result<CartCountResponse, CommerceError> {
        Ok(CartCountResponse {
            count: self.carts.item_count(shopper)?,
        })
    }

    /// Fold a guest cart into a signed-in shopper's cart.
    pub fn merge_carts(
        &self,
        guest: &ShopperId,
        shopper: &ShopperId,
    ) -> Result<CartResponse, CommerceError> {
        self.carts.merge_carts(guest, shopper)?;
        self.cart(shopper)
    }

    /// Convert the shopper's cart into an order.
    pub fn checkout(&self, shopper: &ShopperId) -> Result<CheckoutResponse, CommerceError> {
        let receipt = self.coordinator.checkout(shopper)?;
        Ok(CheckoutResponse {
            order_id: receipt.order_id,
            total: receipt.total,
        })
    }

    /// Cancel an order and restock its units.
    pub fn cancel_order(
        &self,
        shopper: &ShopperId,
        order_id: &OrderId,
    ) -> Result<OrderStatusResponse, CommerceError> {
        Ok(status_response(self.coordinator.cancel_order(shopper, order_id)?))
    }

    /// Record a payment capture reported by the payment capability.
    pub fn mark_order_paid(
        &self,
        shopper: &ShopperId,
        order_id: &OrderId,
    ) -> Result<OrderStatusResponse, CommerceError> {
        Ok(status_response(self.coordinator.mark_paid(shopper, order_id)?))
    }

    /// Record a failed payment attempt.
    pub fn mark_order_failed(
        &self,
        shopper: &ShopperId,
        order_id: &OrderId,
    ) -> Result<OrderStatusResponse, CommerceError> {
        Ok(status_response(self.coordinator.mark_failed(shopper, order_id)?))
    }

    /// The shopper's orders, oldest first.
    pub fn orders(&self, shopper: &ShopperId) -> Result<Vec<Order>, CommerceError> {
        self.orders.orders_for_shopper(shopper)
    }

    fn cart_totals(
        &self,
        shopper: &ShopperId,
    ) -> Result<swiftcart_commerce::cart::CartTotals, CommerceError> {
        let items = self
            .carts
            .snapshot(shopper)?
            .map(|c| c.items)
            .unwrap_or_default();
        if items.is_empty() {
            // An empty cart carries no fee.
            return Ok(swiftcart_commerce::cart::CartTotals::empty(self.config.currency));
        }
        self.pricing.totals(&items, self.flat_fee())
    }

    fn flat_fee(&self) -> Money {
        Money::new(self.config.flat_fee, self.config.currency)
    }

    fn check_line_limit(&self, quantity: i64) -> Result<(), CommerceError> {
        if quantity > self.config.max_quantity_per_line {
            return Err(CommerceError::Validation(format!(
                "quantity {} exceeds per-line limit {}",
                quantity, self.config.max_quantity_per_line
            )));
        }
        Ok(())
    }
}

fn status_response(order: Order) -> OrderStatusResponse {
    OrderStatusResponse {
        order_id: order.id,
        status: order.status,
        total: order.total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiftcart_commerce::catalog::Product;

    fn storefront_with(id: &str, price: i64, stock: i64) -> Storefront {
        let store = Storefront::new(StorefrontConfig::default());
        store.ledger().add_product(
            Product::new(
                ProductId::new(id),
                format!("SKU-{id}"),
                format!("Product {id}"),
                Money::new(price, Currency::USD),
            ),
            stock,
        );
        store
    }

    #[test]
    fn test_add_reports_count_and_total() {
        let store = storefront_with("p1", 1000, 5);
        let shopper = ShopperId::new("s1");
        let resp = store.add_to_cart(&shopper, &ProductId::new("p1"), 3).unwrap();
        assert_eq!(resp.line_quantity, 3);
        assert_eq!(resp.item_count, 3);
        assert_eq!(resp.cart_total.amount, 3000);
        assert!(resp.message.is_none());
    }

    #[test]
    fn test_clamped_add_carries_message() {
        let store = storefront_with("p1", 1000, 2);
        let shopper = ShopperId::new("s1");
        let resp = store.add_to_cart(&shopper, &ProductId::new("p1"), 9).unwrap();
        assert!(resp.clamped);
        assert_eq!(resp.line_quantity, 2);
        assert!(resp.message.is_some());
    }

    #[test]
    fn test_line_limit_is_validation_error() {
        let store = Storefront::new(
            StorefrontConfig::default().with_max_quantity_per_line(10),
        );
        store.ledger().add_product(
            Product::new(
                ProductId::new("p1"),
                "SKU-1",
                "Widget",
                Money::new(1000, Currency::USD),
            ),
            100,
        );
        let shopper = ShopperId::new("s1");
        assert!(matches!(
            store.add_to_cart(&shopper, &ProductId::new("p1"), 11),
            Err(CommerceError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_cart_view_is_valid() {
        let store = storefront_with("p1", 1000, 5);
        let resp = store.cart(&ShopperId::new("nobody")).unwrap();
        assert_eq!(resp.item_count, 0);
        assert!(resp.total.is_zero());
        assert!(resp.lines.is_empty());
    }

    #[test]
    fn test_flat_fee_applied_to_nonempty_cart() {
        let store = Storefront::new(StorefrontConfig::new(Currency::USD).with_flat_fee(250));
        store.ledger().add_product(
            Product::new(
                ProductId::new("p1"),
                "SKU-1",
                "Widget",
                Money::new(1000, Currency::USD),
            ),
            5,
        );
        let shopper = ShopperId::new("s1");

        let empty = store.cart(&shopper).unwrap();
        assert!(empty.total.is_zero());

        store.add_to_cart(&shopper, &ProductId::new("p1"), 1).unwrap();
        let resp = store.cart(&shopper).unwrap();
        assert_eq!(resp.subtotal.amount, 1000);
        assert_eq!(resp.fee_total.amount, 250);
        assert_eq!(resp.total.amount, 1250);
    }

    #[test]
    fn test_checkout_round_trip() {
        let store = storefront_with("p1", 1000, 5);
        let shopper = ShopperId::new("s1");
        store.add_to_cart(&shopper, &ProductId::new("p1"), 3).unwrap();

        let resp = store.checkout(&shopper).unwrap();
        assert_eq!(resp.total.amount, 3000);
        assert_eq!(store.item_count(&shopper).unwrap().count, 0);

        let orders = store.orders(&shopper).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, resp.order_id);
    }
}
