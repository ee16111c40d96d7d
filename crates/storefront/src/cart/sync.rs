//! Derived display values: the quantity counters and the cart total.

use std::sync::Arc;

use tackle_core::{Cart, Price};
use tracing::trace;

use super::store::{CartObserver, CartStore};
use crate::page::TextTarget;

/// Sum of `unitPrice * quantity` over the cart.
#[must_use]
pub fn compute_total(cart: &Cart) -> Price {
    cart.total()
}

/// The cart total formatted for display (`es-AR`).
#[must_use]
pub fn total_text(cart: &Cart) -> String {
    compute_total(cart).to_locale_string()
}

/// Keeps every quantity counter on the page equal to the cart's item count.
#[derive(Default)]
pub struct CounterSync {
    targets: Vec<Arc<dyn TextTarget>>,
}

impl CounterSync {
    /// Sync the given counters. An empty list is fine: updates are skipped.
    #[must_use]
    pub fn new(targets: Vec<Arc<dyn TextTarget>>) -> Self {
        Self { targets }
    }

    /// Write the summed quantity of `cart` to every counter.
    pub fn update_counters(&self, cart: &Cart) {
        let count = cart.item_count().to_string();
        trace!(count = %count, targets = self.targets.len(), "Updating cart counters");
        for target in &self.targets {
            target.set_text(&count);
        }
    }

    /// Load the current cart and update the counters from it.
    pub fn refresh(&self, store: &CartStore) {
        self.update_counters(&store.load());
    }
}

impl CartObserver for CounterSync {
    fn cart_changed(&self, cart: &Cart) {
        self.update_counters(cart);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::TextSlot;
    use crate::storage::MemoryStorage;
    use tackle_core::{ItemId, LineItem};

    fn line(id: &str, price: u32, quantity: u32) -> LineItem {
        LineItem {
            id: ItemId::new(id),
            name: id.to_uppercase(),
            unit_price: Price::from(price),
            quantity,
        }
    }

    #[test]
    fn test_compute_total() {
        let cart = Cart::from_items([line("a", 10, 2), line("b", 5, 1)]);
        assert_eq!(compute_total(&cart), Price::from(25));
        assert_eq!(compute_total(&Cart::new()), Price::ZERO);
    }

    #[test]
    fn test_total_text_uses_locale_grouping() {
        let cart = Cart::from_items([line("a", 1500, 2)]);
        assert_eq!(total_text(&cart), "3.000");
        assert_eq!(total_text(&Cart::new()), "0");
    }

    #[test]
    fn test_counters_follow_store() {
        let badge = Arc::new(TextSlot::new());
        let header = Arc::new(TextSlot::new());
        let sync = Arc::new(CounterSync::new(vec![
            badge.clone() as Arc<dyn TextTarget>,
            header.clone(),
        ]));

        let store = CartStore::new(Arc::new(MemoryStorage::new()));
        store.subscribe(&sync);

        sync.refresh(&store);
        assert_eq!(badge.text(), "0");

        store.save(&Cart::from_items([line("a", 10, 2), line("b", 5, 3)]));
        assert_eq!(badge.text(), "5");
        assert_eq!(header.text(), "5");

        store.clear();
        assert_eq!(badge.text(), "0");
        assert_eq!(header.text(), "0");
    }

    #[test]
    fn test_no_targets_is_fine() {
        let sync = CounterSync::default();
        sync.update_counters(&Cart::from_items([line("a", 1, 1)]));
    }
}
