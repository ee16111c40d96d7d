//! Product search command.
//!
//! # Usage
//!
//! ```bash
//! # Search, falling back to the cards of a saved page
//! tackle search "caña" --page public/index.html
//!
//! # Add a result to the cart by its catalog id
//! tackle search "caña" --add 7
//! ```

use std::path::Path;
use std::sync::Arc;

use tackle_core::ProductId;
use tackle_storefront::StorefrontError;
use tackle_storefront::page::{CardSource, EmptyPage};
use tackle_storefront::search::SearchOutcome;
use tracing::{info, warn};

use super::{CommandError, open_storefront, read_page};

/// Search for `query`, optionally adding the result `add` to the cart.
pub async fn run(query: &str, add: Option<&str>, page: Option<&Path>) -> Result<(), CommandError> {
    let cards: Arc<dyn CardSource> = match page {
        Some(path) => Arc::new(read_page(path)?),
        None => Arc::new(EmptyPage),
    };
    let storefront = open_storefront(cards, false)?;
    let panel = storefront.search();

    let (outcome, _) = panel.run(query).await.map_err(StorefrontError::from)?;
    if let SearchOutcome::Results(results) = &outcome {
        for product in results {
            info!(id = %product.id, price = %product.price, "{}", product.name);
        }
    }

    if let Some(id) = add {
        if panel.add_result(&ProductId::new(id)).await {
            info!(id, items = storefront.cart().cart().item_count(), "Added to cart");
        } else {
            warn!(id, "No product with that id");
        }
    }
    Ok(())
}
