//! Tackle Shop storefront library.
//!
//! Cart state, catalog lookup, search and page view logic for a static
//! fishing tackle storefront. Page surfaces (counters, catalog cards,
//! toasts) are traits so the logic runs against rendered HTML, the CLI or
//! test doubles alike.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod carousel;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod page;
pub mod search;
pub mod state;
pub mod storage;
pub mod view;

pub use error::{Result, StorefrontError};
pub use state::{PageParts, Storefront};
