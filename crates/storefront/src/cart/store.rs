//! The cart store: sole owner of the persisted cart.
//!
//! Every mutation goes through [`CartStore::save`] or [`CartStore::clear`],
//! and both notify subscribed [`CartObserver`]s synchronously, so anything
//! derived from the cart (counters, the modal) is refreshed before the
//! operation returns.
//!
//! The store only holds observers weakly; whoever subscribes keeps them
//! alive, and dropped observers are skipped.

use std::sync::{Arc, RwLock, Weak};

use tackle_core::{Cart, CartDecode};
use tracing::{debug, error, instrument, warn};

use crate::storage::{KeyValueStorage, keys};

/// Receives the cart after every save or clear.
pub trait CartObserver: Send + Sync {
    fn cart_changed(&self, cart: &Cart);
}

/// Persisted cart, backed by a [`KeyValueStorage`].
pub struct CartStore {
    storage: Arc<dyn KeyValueStorage>,
    observers: RwLock<Vec<Weak<dyn CartObserver>>>,
}

impl CartStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer. It is called after every later save or clear
    /// for as long as it is alive.
    pub fn subscribe<O: CartObserver + 'static>(&self, observer: &Arc<O>) {
        let observer: Weak<dyn CartObserver> = Arc::<O>::downgrade(observer);
        if let Ok(mut observers) = self.observers.write() {
            observers.retain(|o| o.strong_count() > 0);
            observers.push(observer);
        }
    }

    /// Read and decode the stored value without collapsing failures.
    #[must_use]
    pub fn decode(&self) -> CartDecode {
        let raw = match self.storage.get(keys::CART) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to read stored cart");
                None
            }
        };
        Cart::decode(raw.as_deref())
    }

    /// The current cart. Never fails: a missing or corrupted value reads as
    /// an empty cart.
    #[instrument(skip(self))]
    pub fn load(&self) -> Cart {
        match self.decode() {
            CartDecode::Loaded(cart) => cart,
            CartDecode::Absent => Cart::new(),
            CartDecode::Corrupted(e) => {
                warn!(error = %e, "Discarding corrupted stored cart");
                Cart::new()
            }
        }
    }

    /// Persist the full cart and notify observers.
    ///
    /// A failed write is logged; observers still see `cart`.
    #[instrument(skip(self, cart), fields(lines = cart.len()))]
    pub fn save(&self, cart: &Cart) {
        match cart.encode() {
            Ok(raw) => {
                if let Err(e) = self.storage.set(keys::CART, &raw) {
                    error!(error = %e, "Failed to persist cart");
                } else {
                    debug!(items = cart.item_count(), "Cart saved");
                }
            }
            Err(e) => error!(error = %e, "Failed to encode cart"),
        }
        self.notify(cart);
    }

    /// Remove the stored cart and notify observers with an empty cart.
    #[instrument(skip(self))]
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(keys::CART) {
            error!(error = %e, "Failed to remove stored cart");
        } else {
            debug!("Cart cleared");
        }
        self.notify(&Cart::new());
    }

    fn notify(&self, cart: &Cart) {
        // Snapshot so observers may subscribe others without deadlocking
        let observers: Vec<Arc<dyn CartObserver>> = match self.observers.read() {
            Ok(observers) => observers.iter().filter_map(Weak::upgrade).collect(),
            Err(_) => return,
        };
        for observer in observers {
            observer.cart_changed(cart);
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let observers = self
            .observers
            .read()
            .map(|o| o.iter().filter(|o| o.strong_count() > 0).count())
            .unwrap_or_default();
        f.debug_struct("CartStore")
            .field("observers", &observers)
            .finish_non_exhaustive()
    }
}
