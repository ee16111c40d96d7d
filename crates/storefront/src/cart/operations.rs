//! Cart operations: the business rules on top of [`CartStore`].
//!
//! Each operation is a synchronous load-modify-save. Unknown ids are
//! no-ops and nothing here returns an error; the outcome types only say
//! what happened.

use std::sync::Arc;

use tackle_core::{Cart, ItemId, NewItem, Price};
use tracing::{debug, info, instrument};

use super::store::CartStore;
use crate::notify::{Notice, SharedNotifier};

pub(crate) const ADDED_TEXT: &str = "Product added to cart ✅";
pub(crate) const EMPTY_CART_TEXT: &str = "Your cart is empty.";
pub(crate) const PURCHASE_TEXT: &str = "Purchase completed successfully 🎣";
pub(crate) const CONFIRM_EMPTY_TEXT: &str = "Empty cart?";

/// Result of [`CartService::change_qty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// No line with that id; nothing was saved.
    Missing,
    /// The line now has this quantity.
    Updated(u32),
    /// The quantity dropped to zero or below and the line was removed.
    Removed,
}

/// Result of [`CartService::checkout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to buy; the cart was left untouched.
    Empty,
    /// The cart held `items` units worth `total` and has been cleared.
    Completed { items: u64, total: Price },
}

/// Result of [`CartService::empty_cart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyCartOutcome {
    AlreadyEmpty,
    Declined,
    Cleared,
}

/// Cart business operations.
#[derive(Clone)]
pub struct CartService {
    store: Arc<CartStore>,
    notifier: SharedNotifier,
}

impl CartService {
    #[must_use]
    pub fn new(store: Arc<CartStore>, notifier: SharedNotifier) -> Self {
        Self { store, notifier }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Current cart contents.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.store.load()
    }

    /// Add one unit. A line with the same id has its quantity bumped;
    /// otherwise a new line with quantity 1 is appended.
    #[instrument(skip(self))]
    pub fn add_item(&self, item: NewItem) {
        let mut cart = self.store.load();
        cart.add(item);
        self.store.save(&cart);
        self.notifier.notify(Notice::success(ADDED_TEXT).dismiss_after(1200));
    }

    /// Adjust a line's quantity by `delta`, removing it at zero or below.
    #[instrument(skip(self))]
    pub fn change_qty(&self, id: &ItemId, delta: i64) -> QuantityChange {
        let mut cart = self.store.load();
        let Some(item) = cart.get_mut(id) else {
            debug!("No cart line to change");
            return QuantityChange::Missing;
        };

        let quantity = i64::from(item.quantity).saturating_add(delta);
        let change = if quantity <= 0 {
            cart.remove(id);
            QuantityChange::Removed
        } else {
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            item.quantity = quantity;
            QuantityChange::Updated(quantity)
        };

        self.store.save(&cart);
        change
    }

    /// Drop a line. Returns whether it was present; the cart is saved
    /// either way.
    #[instrument(skip(self))]
    pub fn remove_item(&self, id: &ItemId) -> bool {
        let mut cart = self.store.load();
        let removed = cart.remove(id).is_some();
        self.store.save(&cart);
        removed
    }

    /// Finish the purchase: report and clear a non-empty cart.
    #[instrument(skip(self))]
    pub fn checkout(&self) -> CheckoutOutcome {
        let cart = self.store.load();
        if cart.is_empty() {
            self.notifier.notify(Notice::info(EMPTY_CART_TEXT));
            return CheckoutOutcome::Empty;
        }

        let outcome = CheckoutOutcome::Completed {
            items: cart.item_count(),
            total: cart.total(),
        };
        self.notifier.notify(Notice::success(PURCHASE_TEXT).dismiss_after(1500));
        self.store.clear();
        info!(?outcome, "Checkout completed");
        outcome
    }

    /// Clear the whole cart after confirmation.
    ///
    /// Without a confirmation dialog the cart is cleared directly.
    #[instrument(skip(self))]
    pub fn empty_cart(&self) -> EmptyCartOutcome {
        if self.store.load().is_empty() {
            return EmptyCartOutcome::AlreadyEmpty;
        }
        if self.notifier.confirm(CONFIRM_EMPTY_TEXT) == Some(false) {
            debug!("Emptying the cart was declined");
            return EmptyCartOutcome::Declined;
        }
        self.store.clear();
        EmptyCartOutcome::Cleared
    }

    /// Immediate purchase of one catalog product.
    ///
    /// If the product is already in the cart its line is removed (it has
    /// just been bought); the purchase notice is shown either way.
    #[instrument(skip(self))]
    pub fn buy_now(&self, id: &ItemId, name: &str) -> bool {
        let mut cart = self.store.load();
        let removed = cart.remove(id).is_some();
        if removed {
            self.store.save(&cart);
        }
        self.notifier.notify(
            Notice::success(format!("Purchase of {name} completed successfully 🎣"))
                .dismiss_after(1500),
        );
        removed
    }
}

impl std::fmt::Debug for CartService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartService")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
