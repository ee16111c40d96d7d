//! Command implementations.

pub mod cart;
pub mod catalog;
pub mod notifier;
pub mod search;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tackle_storefront::config::StorefrontConfig;
use tackle_storefront::page::{CardSource, EmptyPage, HtmlCatalogPage};
use tackle_storefront::{PageParts, Storefront, StorefrontError};
use thiserror::Error;

use notifier::CliNotifier;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The storefront could not be assembled or a view failed.
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// A page file could not be read.
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The cart modal produced no output.
    #[error("Cart view could not be rendered")]
    Render,
}

/// Open the configured storefront over `cards`.
///
/// `assume_yes` answers confirmation prompts.
fn open_storefront(
    cards: Arc<dyn CardSource>,
    assume_yes: bool,
) -> Result<Storefront, CommandError> {
    let config = StorefrontConfig::from_env().map_err(StorefrontError::from)?;
    tracing::debug!(
        storage_dir = %config.storage_dir.display(),
        origin = %config.origin,
        page = %config.page_url,
        "Opening storefront"
    );

    let parts = PageParts {
        cards,
        counters: Vec::new(),
        notifier: Arc::new(CliNotifier::new(assume_yes)),
    };
    Ok(Storefront::from_config(&config, parts)?)
}

/// Open the configured storefront with no catalog page.
fn open_cart(assume_yes: bool) -> Result<Storefront, CommandError> {
    open_storefront(Arc::new(EmptyPage), assume_yes)
}

/// Read a rendered page from disk.
fn read_page(path: &Path) -> Result<HtmlCatalogPage, CommandError> {
    let html = std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(HtmlCatalogPage::new(html))
}
