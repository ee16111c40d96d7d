//! Unified error handling.
//!
//! Cart and catalog operations recover from their own failures; this type
//! covers what can still go wrong while assembling a storefront or
//! rendering a view.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Persistence failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Product list could not be fetched.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A view failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// A page or product list URL is invalid.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
