//! Storefront state shared across page components.

use std::sync::Arc;

use url::Url;

use crate::cart::{CartService, CartStore, CounterSync};
use crate::catalog::{CatalogCache, CatalogWiring};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::notify::SharedNotifier;
use crate::page::{CardSource, TextTarget};
use crate::search::SearchPanel;
use crate::storage::{FileStorage, KeyValueStorage};
use crate::view::CartModal;

/// A page's collaborators, wired together.
///
/// This struct is cheaply cloneable via `Arc`. Counters and the cart modal
/// are subscribed to the store on construction and the counters are
/// refreshed once from the persisted cart.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    page_url: Url,
    cart: CartService,
    counters: Arc<CounterSync>,
    modal: Arc<CartModal>,
    catalog: CatalogCache,
    wiring: CatalogWiring,
    search: SearchPanel,
}

/// What a page provides to the storefront.
pub struct PageParts {
    /// Rendered catalog cards.
    pub cards: Arc<dyn CardSource>,
    /// Cart quantity counters.
    pub counters: Vec<Arc<dyn TextTarget>>,
    pub notifier: SharedNotifier,
}

impl Storefront {
    /// Assemble a storefront for `page_url` over `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list URL cannot be resolved.
    pub fn new(storage: Arc<dyn KeyValueStorage>, page_url: Url, parts: PageParts) -> Result<Self> {
        let PageParts {
            cards,
            counters,
            notifier,
        } = parts;

        let store = Arc::new(CartStore::new(storage));
        let cart = CartService::new(store.clone(), notifier.clone());

        let counters = Arc::new(CounterSync::new(counters));
        store.subscribe(&counters);
        counters.refresh(&store);

        let modal = CartModal::attach(cart.clone(), notifier.clone());
        let catalog = CatalogCache::new(&page_url, cards)?;
        let wiring = CatalogWiring::new(cart.clone());
        let search = SearchPanel::new(catalog.clone(), cart.clone(), notifier);

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                page_url,
                cart,
                counters,
                modal,
                catalog,
                wiring,
                search,
            }),
        })
    }

    /// Assemble a storefront from configuration, persisting to a
    /// [`FileStorage`] scoped to the configured origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list URL cannot be resolved.
    pub fn from_config(config: &StorefrontConfig, parts: PageParts) -> Result<Self> {
        let origin = config.origin.origin().ascii_serialization();
        let storage = Arc::new(FileStorage::new(&config.storage_dir, &origin));
        Self::new(storage, config.page_url.clone(), parts)
    }

    /// Get the current page location.
    #[must_use]
    pub fn page_url(&self) -> &Url {
        &self.inner.page_url
    }

    /// Get the cart operations.
    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    /// Get the counter projection.
    #[must_use]
    pub fn counters(&self) -> &CounterSync {
        &self.inner.counters
    }

    /// Get the cart modal.
    #[must_use]
    pub fn modal(&self) -> &CartModal {
        &self.inner.modal
    }

    /// Get the memoized product list.
    #[must_use]
    pub fn catalog(&self) -> &CatalogCache {
        &self.inner.catalog
    }

    /// Get the catalog card controls.
    #[must_use]
    pub fn wiring(&self) -> &CatalogWiring {
        &self.inner.wiring
    }

    /// Get the search panel.
    #[must_use]
    pub fn search(&self) -> &SearchPanel {
        &self.inner.search
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("page_url", &self.inner.page_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::page::{EmptyPage, TextSlot};
    use crate::storage::MemoryStorage;
    use crate::view::ModalState;
    use tackle_core::{NewItem, Price, make_id};

    fn parts(badge: Arc<TextSlot>) -> PageParts {
        PageParts {
            cards: Arc::new(EmptyPage),
            counters: vec![badge as Arc<dyn TextTarget>],
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    fn page() -> Url {
        Url::parse("http://127.0.0.1:9/pages/reels.html").expect("url")
    }

    #[test]
    fn test_new_refreshes_counters_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(
                crate::storage::keys::CART,
                r#"[{"id":"a","name":"A","unitPrice":10,"quantity":3}]"#,
            )
            .expect("seed");

        let badge = Arc::new(TextSlot::new());
        let storefront =
            Storefront::new(storage, page(), parts(badge.clone())).expect("storefront");
        assert_eq!(badge.text(), "3");
        assert_eq!(
            storefront.catalog().products_url().as_str(),
            "http://127.0.0.1:9/products.json"
        );
    }

    #[test]
    fn test_components_share_one_store() {
        let badge = Arc::new(TextSlot::new());
        let storefront =
            Storefront::new(Arc::new(MemoryStorage::new()), page(), parts(badge.clone()))
                .expect("storefront");

        storefront.modal().open();
        storefront
            .cart()
            .add_item(NewItem::new(make_id("Caña", 1500), "Caña", Price::from(1500)));

        assert_eq!(badge.text(), "1");
        assert_eq!(storefront.modal().state(), ModalState::Open);
        assert_eq!(
            storefront.modal().rendered().expect("rendered").view.total,
            "1.500"
        );
    }

    #[test]
    fn test_from_config_uses_file_storage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = StorefrontConfig::with_storage_dir(dir.path())
            .expect("config")
            .at_page(page());

        let storefront =
            Storefront::from_config(&config, parts(Arc::new(TextSlot::new()))).expect("storefront");
        storefront
            .cart()
            .add_item(NewItem::new("x", "X", Price::from(1)));

        let reopened =
            Storefront::from_config(&config, parts(Arc::new(TextSlot::new()))).expect("storefront");
        assert_eq!(reopened.cart().cart().item_count(), 1);
    }
}
