//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TACKLE_STORAGE_DIR` - Root directory of the persisted stores (default: .tackle)
//! - `TACKLE_ORIGIN` - Origin the cart store is scoped to (default: <http://localhost:8080>)
//! - `TACKLE_PAGE_URL` - Location of the current page (default: `{origin}/index.html`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_STORAGE_DIR: &str = ".tackle";
const DEFAULT_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_PAGE: &str = "index.html";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Root directory for file-backed storage
    pub storage_dir: PathBuf,
    /// Origin scoping the persisted cart
    pub origin: Url,
    /// Current page; the product list is resolved against it
    pub page_url: Url,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a URL variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_dir =
            PathBuf::from(get_env_or_default("TACKLE_STORAGE_DIR", DEFAULT_STORAGE_DIR));
        let origin = parse_url(
            "TACKLE_ORIGIN",
            &get_env_or_default("TACKLE_ORIGIN", DEFAULT_ORIGIN),
        )?;
        let page_url = match get_optional_env("TACKLE_PAGE_URL") {
            Some(value) => parse_url("TACKLE_PAGE_URL", &value)?,
            None => default_page_url(&origin)?,
        };

        Ok(Self {
            storage_dir,
            origin,
            page_url,
        })
    }

    /// Configuration rooted at `storage_dir` with the default origin and page.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the default URLs do not parse.
    pub fn with_storage_dir(storage_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let origin = parse_url("TACKLE_ORIGIN", DEFAULT_ORIGIN)?;
        let page_url = default_page_url(&origin)?;
        Ok(Self {
            storage_dir: storage_dir.into(),
            origin,
            page_url,
        })
    }

    /// Replace the page location.
    #[must_use]
    pub fn at_page(mut self, page_url: Url) -> Self {
        self.page_url = page_url;
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn default_page_url(origin: &Url) -> Result<Url, ConfigError> {
    origin
        .join(DEFAULT_PAGE)
        .map_err(|e| ConfigError::InvalidEnvVar("TACKLE_ORIGIN".to_string(), e.to_string()))
}
