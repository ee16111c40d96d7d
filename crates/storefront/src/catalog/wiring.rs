//! "Add to cart" and "Buy now" controls on rendered catalog cards.

use std::collections::HashSet;
use std::sync::RwLock;

use tackle_core::{ItemId, NewItem, Price, make_id};
use tracing::{debug, instrument};

use crate::cart::CartService;
use crate::page::RenderedCard;

/// A shop card with its derived cart identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCard {
    /// Position among the page's `.product` / `.card` elements.
    pub index: usize,
    pub name: String,
    pub price: Price,
    pub id: ItemId,
    pub has_add_button: bool,
    pub has_buy_button: bool,
}

impl CatalogCard {
    /// Read name and price off a card and derive its id.
    #[must_use]
    pub fn from_rendered(index: usize, card: &RenderedCard) -> Self {
        let name = card
            .title
            .clone()
            .unwrap_or_else(|| format!("Product #{}", index + 1));
        let price = card
            .price
            .as_deref()
            .map_or(Price::ZERO, Price::from_digits);
        let id = make_id(&name, price);

        Self {
            index,
            name,
            price,
            id,
            has_add_button: card.has_add_button,
            has_buy_button: card.has_buy_button,
        }
    }
}

/// Binds card controls to cart operations, each card at most once.
pub struct CatalogWiring {
    service: CartService,
    wired: RwLock<HashSet<usize>>,
}

impl CatalogWiring {
    #[must_use]
    pub fn new(service: CartService) -> Self {
        Self {
            service,
            wired: RwLock::new(HashSet::new()),
        }
    }

    /// Wire the controls of `.product` / `.card` elements not wired yet.
    ///
    /// Returns the newly wired cards; calling again with the same page
    /// returns nothing.
    #[instrument(skip_all, fields(cards = cards.len()))]
    pub fn wire(&self, cards: &[RenderedCard]) -> Vec<CatalogCard> {
        let Ok(mut wired) = self.wired.write() else {
            return Vec::new();
        };

        let newly_wired: Vec<CatalogCard> = cards
            .iter()
            .filter(|card| card.is_shop_card())
            .enumerate()
            .map(|(index, card)| CatalogCard::from_rendered(index, card))
            .filter(|card| card.has_add_button || card.has_buy_button)
            .filter(|card| wired.insert(card.index))
            .collect();

        debug!(wired = newly_wired.len(), "Catalog controls wired");
        newly_wired
    }

    /// "Add to cart" on `card`. Returns `false` if the card has no such
    /// control.
    pub fn add_to_cart(&self, card: &CatalogCard) -> bool {
        if !card.has_add_button {
            return false;
        }
        self.service
            .add_item(NewItem::new(card.id.clone(), card.name.clone(), card.price));
        true
    }

    /// "Buy now" on `card`. Returns `false` if the card has no such control.
    pub fn buy_now(&self, card: &CatalogCard) -> bool {
        if !card.has_buy_button {
            return false;
        }
        self.service.buy_now(&card.id, &card.name);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cart::CartStore;
    use crate::notify::RecordingNotifier;
    use crate::page::{CardKind, CardSource, HtmlCatalogPage};
    use crate::storage::MemoryStorage;

    const PAGE: &str = r#"
        <div class="product">
          <h3 class="card-title">Caña</h3>
          <span class="price">$1.500</span>
          <button class="add-to-cart">Agregar</button>
          <button class="btn buy-now">Comprar</button>
        </div>
        <div class="producto"><h4>Solo lectura</h4></div>
        <div class="card">
          <span class="price">$300</span>
          <button class="add-to-cart">Agregar</button>
        </div>
    "#;

    fn wiring() -> (CartService, CatalogWiring) {
        let store = Arc::new(CartStore::new(Arc::new(MemoryStorage::new())));
        let service = CartService::new(store, Arc::new(RecordingNotifier::new()));
        (service.clone(), CatalogWiring::new(service))
    }

    #[test]
    fn test_from_rendered_derives_id() {
        let card = RenderedCard {
            kind: Some(CardKind::Card),
            title: Some("Caña".to_string()),
            price: Some("$ 1.500".to_string()),
            has_add_button: true,
            ..RenderedCard::default()
        };
        let card = CatalogCard::from_rendered(0, &card);
        assert_eq!(card.price, Price::from(1500));
        assert_eq!(card.id.as_str(), "caña|1500");
    }

    #[test]
    fn test_wire_skips_read_only_cards_and_names_missing_titles() {
        let (_, wiring) = wiring();
        let cards = wiring.wire(&HtmlCatalogPage::new(PAGE).cards());

        let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Caña", "Product #2"]);
        assert_eq!(cards[1].id.as_str(), "product-#2|300");
    }

    #[test]
    fn test_wire_is_idempotent() {
        let (_, wiring) = wiring();
        let page = HtmlCatalogPage::new(PAGE).cards();
        assert_eq!(wiring.wire(&page).len(), 2);
        assert!(wiring.wire(&page).is_empty());
    }

    #[test]
    fn test_add_to_cart_then_buy_now() {
        let (service, wiring) = wiring();
        let cards = wiring.wire(&HtmlCatalogPage::new(PAGE).cards());
        let cana = &cards[0];

        assert!(wiring.add_to_cart(cana));
        assert!(wiring.add_to_cart(cana));
        assert_eq!(service.cart().item_count(), 2);

        assert!(wiring.buy_now(cana));
        assert!(service.cart().is_empty());

        assert!(!wiring.buy_now(&cards[1]));
    }
}
