//! Cart state management.
//!
//! - [`store`] - Persisted cart, the only writer of stored state
//! - [`operations`] - Add, change quantity, remove, checkout, buy now
//! - [`sync`] - Counter projection and total computation
//!
//! Data flows one way: UI event -> [`CartService`] -> [`CartStore`] ->
//! observers (counters, modal).

pub mod operations;
pub mod store;
pub mod sync;

pub use operations::{CartService, CheckoutOutcome, EmptyCartOutcome, QuantityChange};
pub use store::{CartObserver, CartStore};
pub use sync::{CounterSync, compute_total, total_text};
