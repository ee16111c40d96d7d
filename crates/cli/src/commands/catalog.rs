//! Catalog page commands.

use std::path::Path;
use std::sync::Arc;

use tackle_storefront::catalog::scan_cards;
use tackle_storefront::page::CardSource;
use tracing::info;

use super::{CommandError, open_storefront, read_page};

/// List the products on a rendered page and the cart ids of its shop cards.
pub fn scan(path: &Path) -> Result<(), CommandError> {
    let page = Arc::new(read_page(path)?);
    let cards = page.cards();

    let products = scan_cards(&cards);
    info!(path = %path.display(), count = products.len(), "Catalog cards");
    for product in &products {
        info!(id = %product.id, price = %product.price, "{}", product.name);
    }

    let storefront = open_storefront(page, false)?;
    for card in storefront.wiring().wire(&cards) {
        info!(
            id = %card.id,
            add = card.has_add_button,
            buy = card.has_buy_button,
            "{}",
            card.name
        );
    }
    Ok(())
}
