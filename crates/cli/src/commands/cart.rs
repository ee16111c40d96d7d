//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! tackle cart add "Caña" 1500
//! tackle cart dec "caña|1500"
//! tackle cart clear --yes
//! tackle buy "Reel Frontal" 8500
//! ```

use tackle_core::{ItemId, NewItem, Price, make_id};
use tackle_storefront::cart::{CheckoutOutcome, EmptyCartOutcome, QuantityChange, total_text};
use tracing::{info, warn};

use super::{CommandError, open_cart};

/// Print every line, the item count and the total.
pub fn show() -> Result<(), CommandError> {
    let storefront = open_cart(false)?;
    let cart = storefront.cart().cart();

    if cart.is_empty() {
        info!("Your cart is empty.");
        return Ok(());
    }

    for line in &cart {
        info!(
            id = %line.id,
            quantity = line.quantity,
            unit_price = %line.unit_price,
            subtotal = %line.subtotal(),
            "{}",
            line.name
        );
    }
    info!(items = cart.item_count(), "Total: {}", total_text(&cart));
    Ok(())
}

/// Add one unit of `name` at `price`, keyed by its derived id.
pub fn add(name: &str, price: Price) -> Result<(), CommandError> {
    let storefront = open_cart(false)?;
    let id = make_id(name, price);
    storefront
        .cart()
        .add_item(NewItem::new(id.clone(), name, price));
    info!(id = %id, items = storefront.cart().cart().item_count(), "Cart updated");
    Ok(())
}

/// Change the quantity of line `id` by `delta`.
pub fn change(id: &str, delta: i64) -> Result<(), CommandError> {
    let storefront = open_cart(false)?;
    match storefront.cart().change_qty(&ItemId::new(id), delta) {
        QuantityChange::Missing => warn!(id, "No such cart line"),
        QuantityChange::Updated(quantity) => info!(id, quantity, "Quantity updated"),
        QuantityChange::Removed => info!(id, "Line removed"),
    }
    Ok(())
}

/// Remove line `id`.
pub fn remove(id: &str) -> Result<(), CommandError> {
    let storefront = open_cart(false)?;
    if storefront.cart().remove_item(&ItemId::new(id)) {
        info!(id, "Line removed");
    } else {
        warn!(id, "No such cart line");
    }
    Ok(())
}

/// Empty the cart; `yes` confirms.
pub fn clear(yes: bool) -> Result<(), CommandError> {
    let storefront = open_cart(yes)?;
    match storefront.cart().empty_cart() {
        EmptyCartOutcome::AlreadyEmpty => info!("Cart already empty"),
        EmptyCartOutcome::Declined => info!("Cart left unchanged"),
        EmptyCartOutcome::Cleared => info!("Cart emptied"),
    }
    Ok(())
}

/// Complete the purchase of the whole cart.
pub fn checkout() -> Result<(), CommandError> {
    let storefront = open_cart(false)?;
    if let CheckoutOutcome::Completed { items, total } = storefront.cart().checkout() {
        info!(items, "Charged {}", total.to_locale_string());
    }
    Ok(())
}

/// Print the cart modal HTML.
pub fn render() -> Result<(), CommandError> {
    let storefront = open_cart(false)?;
    let rendered = storefront.modal().open().ok_or(CommandError::Render)?;
    info!(lines = rendered.view.items.len(), "\n{}", rendered.html);
    Ok(())
}

/// Buy `name` at `price` right away.
pub fn buy(name: &str, price: Price) -> Result<(), CommandError> {
    let storefront = open_cart(false)?;
    let id = make_id(name, price);
    storefront.cart().buy_now(&id, name);
    Ok(())
}
