//! Shopping cart store.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::watch;

use bazaar_core::ProductId;

use crate::api::types::Product;

/// One product in the cart with its selected quantity.
///
/// Invariant: the cart holds at most one item per product id, and every
/// held quantity is positive.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Discounted price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.discounted_price() * Decimal::from(self.quantity)
    }
}

/// The shopping cart.
///
/// Cheaply cloneable; clones share the same entries. Observers subscribe
/// through [`CartStore::subscribe`] and are notified on every effective
/// mutation. Quantities are never capped against product stock.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<watch::Sender<Vec<CartItem>>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(tx),
        }
    }

    /// Add a product to the cart.
    ///
    /// A quantity of zero is a no-op. If the product already has an entry
    /// its quantity is incremented; otherwise a new entry is appended,
    /// preserving insertion order.
    pub fn add_product(&self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        self.inner.send_if_modified(|items| {
            if let Some(existing) = items.iter_mut().find(|item| item.product.id == product.id) {
                existing.quantity += quantity;
            } else {
                items.push(CartItem { product, quantity });
            }
            true
        });
    }

    /// Remove a product's entry. A no-op when the product is absent.
    pub fn remove_product(&self, product_id: &ProductId) {
        self.inner.send_if_modified(|items| {
            let before = items.len();
            items.retain(|item| item.product.id != *product_id);
            items.len() != before
        });
    }

    /// Set a product's quantity to exactly `quantity` (not additive).
    ///
    /// A quantity of zero removes the entry; an absent product is a no-op.
    pub fn update_quantity(&self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_product(product_id);
            return;
        }

        self.inner.send_if_modified(|items| {
            items
                .iter_mut()
                .find(|item| item.product.id == *product_id)
                .is_some_and(|item| {
                    let changed = item.quantity != quantity;
                    item.quantity = quantity;
                    changed
                })
        });
    }

    /// Empty the cart unconditionally.
    pub fn clear(&self) {
        self.inner.send_if_modified(|items| {
            if items.is_empty() {
                false
            } else {
                items.clear();
                true
            }
        });
    }

    /// Snapshot of the current entries, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.inner.borrow().clone()
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.inner
            .borrow()
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum()
    }

    /// Total discounted value across all entries.
    #[must_use]
    pub fn total_value(&self) -> Decimal {
        self.inner.borrow().iter().map(CartItem::line_total).sum()
    }

    /// Subscribe to cart changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartItem>> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::api::fallback;

    fn product(index: usize) -> Product {
        fallback::catalog()
            .into_iter()
            .nth(index)
            .expect("fallback catalog has six products")
    }

    #[test]
    fn test_add_same_product_merges_into_one_entry() {
        let cart = CartStore::new();
        cart.add_product(product(0), 2);
        cart.add_product(product(0), 3);

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().map(|item| item.quantity), Some(5));
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let cart = CartStore::new();
        cart.add_product(product(0), 0);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let cart = CartStore::new();
        cart.add_product(product(2), 1);
        cart.add_product(product(0), 1);
        cart.add_product(product(2), 1);

        let ids: Vec<_> = cart
            .items()
            .into_iter()
            .map(|item| item.product.id)
            .collect();
        assert_eq!(ids, vec![product(2).id, product(0).id]);
    }

    #[test]
    fn test_update_quantity_sets_exactly() {
        let cart = CartStore::new();
        let p = product(0);
        cart.add_product(p.clone(), 4);

        cart.update_quantity(&p.id, 2);
        assert_eq!(cart.total_count(), 2);

        // Setting, not adding
        cart.update_quantity(&p.id, 2);
        assert_eq!(cart.total_count(), 2);
    }

    #[test]
    fn test_update_quantity_zero_removes_entry() {
        let cart = CartStore::new();
        let p = product(0);
        cart.add_product(p.clone(), 4);

        cart.update_quantity(&p.id, 0);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_update_or_remove_absent_product_is_noop() {
        let cart = CartStore::new();
        cart.add_product(product(0), 1);

        cart.update_quantity(&product(1).id, 7);
        cart.remove_product(&product(1).id);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_count(), 1);
    }

    #[test]
    fn test_total_value_uses_discounted_prices() {
        let cart = CartStore::new();
        let camera = product(0);
        let vases = product(1);
        cart.add_product(camera.clone(), 2);
        cart.add_product(vases.clone(), 1);

        let expected = camera.discounted_price() * Decimal::from(2) + vases.discounted_price();
        assert_eq!(cart.total_value(), expected);

        cart.remove_product(&camera.id);
        assert_eq!(cart.total_value(), vases.discounted_price());

        cart.clear();
        assert_eq!(cart.total_value(), Decimal::ZERO);
        assert_eq!(cart.total_count(), 0);
    }

    #[test]
    fn test_subscribers_see_mutations() {
        let cart = CartStore::new();
        let mut rx = cart.subscribe();

        assert!(!rx.has_changed().expect("channel open"));
        cart.add_product(product(0), 1);
        assert!(rx.has_changed().expect("channel open"));

        let seen = rx.borrow_and_update().len();
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_noop_mutations_do_not_notify() {
        let cart = CartStore::new();
        cart.add_product(product(0), 1);

        let mut rx = cart.subscribe();
        cart.remove_product(&product(1).id);
        cart.update_quantity(&product(1).id, 3);
        cart.add_product(product(2), 0);

        assert!(!rx.has_changed().expect("channel open"));
    }
}
