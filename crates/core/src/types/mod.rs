//! Core types for Tackle Shop.
//!
//! This module provides type-safe wrappers for the cart and catalog domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartDecode, CartDecodeError, LineItem, NewItem};
pub use id::*;
pub use price::Price;
pub use product::Product;
