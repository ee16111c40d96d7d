//! Tackle Shop Core - Shared types library.
//!
//! This crate provides common types used across all Tackle Shop components:
//! - `storefront` - Cart store, catalog search and page view logic
//! - `cli` - Command-line driver for the cart and catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Item ids, prices, line items, carts and catalog products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
