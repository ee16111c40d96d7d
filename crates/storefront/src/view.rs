//! Cart modal view.
//!
//! The modal is either closed or open. Opening always renders from the
//! current store state, and while open the modal re-renders on every cart
//! change because it is subscribed to the store. Row and footer controls
//! dispatch to [`CartService`].

use std::sync::{Arc, RwLock};

use askama::Template;
use tackle_core::{Cart, ItemId, LineItem, Price};
use tracing::{debug, error, instrument};

use crate::cart::{CartObserver, CartService, total_text};
use crate::notify::{Notice, SharedNotifier};

const REMOVED_TEXT: &str = "Product removed ❌";

/// Cart line display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: "0".to_string(),
            item_count: 0,
        }
    }
}

/// Format a price for a table cell.
fn format_price(price: Price) -> String {
    format!("${price}")
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            quantity: item.quantity,
            price: format_price(item.unit_price),
            line_price: format_price(item.subtotal()),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        if cart.is_empty() {
            return Self::empty();
        }
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: total_text(cart),
            item_count: cart.item_count(),
        }
    }
}

/// Cart modal template.
#[derive(Template)]
#[template(path = "cart/modal.html")]
pub struct CartModalTemplate {
    pub cart: CartView,
}

/// A finished render: the view data and its HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCart {
    pub view: CartView,
    pub html: String,
}

impl RenderedCart {
    /// Render a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render(cart: &Cart) -> Result<Self, askama::Error> {
        let view = CartView::from(cart);
        let html = CartModalTemplate { cart: view.clone() }.render()?;
        Ok(Self { view, html })
    }
}

/// Modal visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

/// Controls on a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Decrement,
    Increment,
    Remove,
}

/// Controls in the modal frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Close button or a click on the backdrop.
    Close,
    /// "Empty cart" button.
    EmptyCart,
    /// "Checkout" button.
    Checkout,
}

#[derive(Debug, Default)]
struct ModalInner {
    state: ModalState,
    rendered: Option<RenderedCart>,
}

/// The cart modal.
pub struct CartModal {
    service: CartService,
    notifier: SharedNotifier,
    inner: RwLock<ModalInner>,
}

impl CartModal {
    /// Create the modal and subscribe it to the service's store.
    #[must_use]
    pub fn attach(service: CartService, notifier: SharedNotifier) -> Arc<Self> {
        let modal = Arc::new(Self {
            service,
            notifier,
            inner: RwLock::new(ModalInner::default()),
        });
        modal.service.store().subscribe(&modal);
        modal
    }

    /// Current visibility.
    #[must_use]
    pub fn state(&self) -> ModalState {
        self.inner
            .read()
            .map(|inner| inner.state)
            .unwrap_or_default()
    }

    /// The most recent render, if the modal has been opened.
    #[must_use]
    pub fn rendered(&self) -> Option<RenderedCart> {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.rendered.clone())
    }

    /// Show the modal, rendering fresh from the store.
    #[instrument(skip(self))]
    pub fn open(&self) -> Option<RenderedCart> {
        let cart = self.service.cart();
        let rendered = Self::render_logged(&cart);
        if let Ok(mut inner) = self.inner.write() {
            inner.state = ModalState::Open;
            inner.rendered.clone_from(&rendered);
        }
        debug!(lines = cart.len(), "Cart modal opened");
        rendered
    }

    /// Hide the modal.
    pub fn close(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.state = ModalState::Closed;
        }
    }

    /// Handle a row control for the line `id`.
    #[instrument(skip(self))]
    pub fn handle_row(&self, id: &ItemId, action: RowAction) {
        match action {
            RowAction::Decrement => {
                self.service.change_qty(id, -1);
            }
            RowAction::Increment => {
                self.service.change_qty(id, 1);
            }
            RowAction::Remove => {
                self.service.remove_item(id);
                self.notifier.notify(Notice::info(REMOVED_TEXT).dismiss_after(900));
            }
        }
    }

    /// Handle a modal frame control.
    #[instrument(skip(self))]
    pub fn handle(&self, action: ModalAction) {
        match action {
            ModalAction::Close => self.close(),
            ModalAction::EmptyCart => {
                self.service.empty_cart();
            }
            ModalAction::Checkout => {
                self.service.checkout();
            }
        }
    }

    fn render_logged(cart: &Cart) -> Option<RenderedCart> {
        match RenderedCart::render(cart) {
            Ok(rendered) => Some(rendered),
            Err(e) => {
                error!(error = %e, "Failed to render cart modal");
                None
            }
        }
    }
}

impl CartObserver for CartModal {
    fn cart_changed(&self, cart: &Cart) {
        if self.state() != ModalState::Open {
            return;
        }
        let rendered = Self::render_logged(cart);
        if let Ok(mut inner) = self.inner.write() {
            inner.rendered = rendered;
        }
    }
}

impl std::fmt::Debug for CartModal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartModal")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartStore;
    use crate::notify::{RecordingNotifier, Severity};
    use crate::storage::MemoryStorage;
    use tackle_core::{NewItem, make_id};

    fn modal_with(notifier: Arc<RecordingNotifier>) -> (CartService, Arc<CartModal>) {
        let store = Arc::new(CartStore::new(Arc::new(MemoryStorage::new())));
        let service = CartService::new(store, notifier.clone());
        let modal = CartModal::attach(service.clone(), notifier);
        (service, modal)
    }

    fn add_cana(service: &CartService) {
        service.add_item(NewItem::new(make_id("Caña", 1500), "Caña", Price::from(1500)));
    }

    #[test]
    fn test_view_from_cart() {
        let mut cart = Cart::new();
        cart.add(NewItem::new(make_id("Caña", 1500), "Caña", Price::from(1500)));
        cart.add(NewItem::new(make_id("Caña", 1500), "Caña", Price::from(1500)));

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, "3.000");
        assert_eq!(
            view.items,
            vec![CartItemView {
                id: "caña|1500".to_string(),
                name: "Caña".to_string(),
                quantity: 2,
                price: "$1500".to_string(),
                line_price: "$3000".to_string(),
            }]
        );
    }

    #[test]
    fn test_render_empty_cart() {
        let rendered = RenderedCart::render(&Cart::new()).expect("render");
        assert_eq!(rendered.view, CartView::empty());
        assert!(rendered.html.contains("Your cart is empty."));
        assert!(rendered.html.contains(r#"<span id="cart-total">0</span>"#));
        assert!(!rendered.html.contains("<table>"));
    }

    #[test]
    fn test_render_escapes_names() {
        let mut cart = Cart::new();
        cart.add(NewItem::new("x", "<script>alert(1)</script>", Price::from(1)));
        let rendered = RenderedCart::render(&cart).expect("render");
        assert!(!rendered.html.contains("<script>"));
        assert!(rendered.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_open_renders_current_state() {
        let (service, modal) = modal_with(Arc::new(RecordingNotifier::new()));
        add_cana(&service);
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(modal.rendered().is_none());

        let rendered = modal.open().expect("rendered");
        assert_eq!(modal.state(), ModalState::Open);
        assert_eq!(rendered.view.item_count, 1);
        assert!(rendered.html.contains(r#"data-id="caña|1500""#));
    }

    #[test]
    fn test_open_modal_rerenders_on_change() {
        let (service, modal) = modal_with(Arc::new(RecordingNotifier::new()));
        modal.open();
        add_cana(&service);

        let rendered = modal.rendered().expect("rendered");
        assert_eq!(rendered.view.item_count, 1);

        modal.handle_row(&make_id("Caña", 1500), RowAction::Increment);
        assert_eq!(modal.rendered().expect("rendered").view.item_count, 2);

        modal.handle_row(&make_id("Caña", 1500), RowAction::Decrement);
        modal.handle_row(&make_id("Caña", 1500), RowAction::Decrement);
        let rendered = modal.rendered().expect("rendered");
        assert!(rendered.view.items.is_empty());
        assert!(service.cart().is_empty());
    }

    #[test]
    fn test_closed_modal_does_not_rerender() {
        let (service, modal) = modal_with(Arc::new(RecordingNotifier::new()));
        modal.open();
        modal.handle(ModalAction::Close);
        add_cana(&service);

        assert_eq!(modal.state(), ModalState::Closed);
        assert_eq!(modal.rendered().expect("rendered").view.item_count, 0);
    }

    #[test]
    fn test_remove_row_notifies() {
        let notifier = Arc::new(RecordingNotifier::new());
        let (service, modal) = modal_with(notifier.clone());
        add_cana(&service);
        modal.open();

        modal.handle_row(&make_id("Caña", 1500), RowAction::Remove);
        assert!(service.cart().is_empty());

        let notice = notifier.last().expect("notice");
        assert_eq!(notice.severity, Severity::Info);
        assert_eq!(notice.text, REMOVED_TEXT);
    }

    #[test]
    fn test_checkout_from_modal_clears_and_rerenders() {
        let (service, modal) = modal_with(Arc::new(RecordingNotifier::new()));
        add_cana(&service);
        modal.open();

        modal.handle(ModalAction::Checkout);
        assert!(service.cart().is_empty());
        assert!(
            modal
                .rendered()
                .expect("rendered")
                .html
                .contains("Your cart is empty.")
        );
    }

    #[test]
    fn test_empty_cart_from_modal() {
        let notifier = Arc::new(RecordingNotifier::answering(true));
        let (service, modal) = modal_with(notifier);
        add_cana(&service);
        modal.open();

        modal.handle(ModalAction::EmptyCart);
        assert!(service.cart().is_empty());
    }

    #[test]
    fn test_render_oversized_total() {
        let cart = Cart::from_items([LineItem {
            id: ItemId::new("a"),
            name: "A".to_string(),
            unit_price: Price::MAX,
            quantity: 2,
        }]);

        let rendered = RenderedCart::render(&cart).expect("render");
        assert_eq!(rendered.view.total, Price::MAX.to_locale_string());
        assert_eq!(rendered.view.item_count, 2);
    }

    #[test]
    fn test_modal_is_freed_when_dropped() {
        let notifier = Arc::new(RecordingNotifier::new());
        let (service, modal) = modal_with(notifier);
        assert_eq!(Arc::strong_count(&modal), 1);

        let weak = Arc::downgrade(&modal);
        drop(modal);
        assert!(weak.upgrade().is_none());

        add_cana(&service);
        assert_eq!(service.cart().item_count(), 1);
    }
}
