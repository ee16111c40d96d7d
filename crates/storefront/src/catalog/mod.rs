//! Product catalog: the `products.json` list and the cards on the page.
//!
//! The list is fetched once with `reqwest` and memoized in a `moka` cache
//! for the life of the process (no TTL, no invalidation). When the fetch
//! fails the catalog cards already rendered on the page are scanned into an
//! equivalent list, and that list is memoized instead.
//!
//! Two overlapping first calls may both fetch; whichever finishes last wins
//! the cache slot.

mod wiring;

use std::sync::Arc;

use moka::future::Cache;
use tackle_core::{Price, Product, ProductId};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::page::{CardSource, RenderedCard};

pub use wiring::{CatalogCard, CatalogWiring};

/// File name of the static product list.
pub const PRODUCTS_FILE: &str = "products.json";

/// Path segment marking pages that live one directory below the site root.
const SUBSECTION_SEGMENT: &str = "/pages/";

/// Errors fetching the product list. Never surfaced past the cache.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("product list returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("product list is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// URL of `products.json` relative to the page at `page_url`.
///
/// Pages under `/pages/` look one directory up; everything else looks in
/// its own directory.
///
/// # Errors
///
/// Returns an error if the relative path cannot be joined onto `page_url`.
pub fn resolve_products_url(page_url: &Url) -> Result<Url, url::ParseError> {
    let relative = if page_url.path().to_lowercase().contains(SUBSECTION_SEGMENT) {
        "../products.json"
    } else {
        "./products.json"
    };
    page_url.join(relative)
}

/// Turn rendered cards into a product list.
///
/// Ids are 1-based positions; names fall back to `Product #n` and prices to
/// the digits of the price text, or zero.
#[must_use]
pub fn scan_cards(cards: &[RenderedCard]) -> Vec<Product> {
    cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let position = i + 1;
            let name = card
                .any_title
                .clone()
                .unwrap_or_else(|| format!("Product #{position}"));
            let price = card
                .any_price
                .as_deref()
                .map_or(Price::ZERO, Price::from_digits);
            Product {
                id: ProductId::new(position.to_string()),
                name,
                price,
            }
        })
        .collect()
}

/// Memoized product list for one page.
#[derive(Clone)]
pub struct CatalogCache {
    inner: Arc<CatalogCacheInner>,
}

struct CatalogCacheInner {
    client: reqwest::Client,
    products_url: Url,
    cards: Arc<dyn CardSource>,
    cache: Cache<Url, Arc<Vec<Product>>>,
}

impl CatalogCache {
    /// Create a cache for the page at `page_url`, falling back to `cards`.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list URL cannot be resolved.
    pub fn new(page_url: &Url, cards: Arc<dyn CardSource>) -> Result<Self, url::ParseError> {
        let products_url = resolve_products_url(page_url)?;
        let cache = Cache::builder().max_capacity(8).build();
        // products.json is same-origin; system proxies do not apply
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .unwrap_or_default();

        Ok(Self {
            inner: Arc::new(CatalogCacheInner {
                client,
                products_url,
                cards,
                cache,
            }),
        })
    }

    /// Where the product list is fetched from.
    #[must_use]
    pub fn products_url(&self) -> &Url {
        &self.inner.products_url
    }

    /// The product list, fetching it on first use.
    #[instrument(skip(self), fields(url = %self.inner.products_url))]
    pub async fn products(&self) -> Arc<Vec<Product>> {
        let key = &self.inner.products_url;
        if let Some(products) = self.inner.cache.get(key).await {
            debug!(count = products.len(), "Product list served from cache");
            return products;
        }

        let products = match self.fetch().await {
            Ok(products) => {
                info!(count = products.len(), "Product list fetched");
                products
            }
            Err(e) => {
                let products = scan_cards(&self.inner.cards.cards());
                warn!(
                    error = %e,
                    count = products.len(),
                    "Product list unavailable, using rendered cards"
                );
                products
            }
        };

        let products = Arc::new(products);
        self.inner.cache.insert(key.clone(), products.clone()).await;
        products
    }

    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.products_url.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCache")
            .field("products_url", &self.inner.products_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{CardKind, EmptyPage};

    fn url(s: &str) -> Url {
        Url::parse(s).expect("valid url")
    }

    #[test]
    fn test_resolve_products_url_at_root() {
        let resolved = resolve_products_url(&url("http://shop.test/index.html")).expect("join");
        assert_eq!(resolved.as_str(), "http://shop.test/products.json");
    }

    #[test]
    fn test_resolve_products_url_in_subsection() {
        let resolved =
            resolve_products_url(&url("http://shop.test/Pages/reels.html")).expect("join");
        assert_eq!(resolved.as_str(), "http://shop.test/products.json");

        let resolved =
            resolve_products_url(&url("http://shop.test/shop/pages/rods.html")).expect("join");
        assert_eq!(resolved.as_str(), "http://shop.test/shop/products.json");
    }

    #[test]
    fn test_scan_cards_with_fallbacks() {
        let cards = vec![
            RenderedCard {
                kind: Some(CardKind::Card),
                any_title: Some("Caña".to_string()),
                any_price: Some("$ 1.500".to_string()),
                ..RenderedCard::default()
            },
            RenderedCard {
                kind: Some(CardKind::Item),
                ..RenderedCard::default()
            },
        ];

        let products = scan_cards(&cards);
        assert_eq!(
            products,
            vec![
                Product::new("1", "Caña", 1500),
                Product::new("2", "Product #2", 0),
            ]
        );
    }

    #[tokio::test]
    async fn test_unreachable_source_falls_back_and_memoizes() {
        let cards: Vec<RenderedCard> = vec![RenderedCard {
            kind: Some(CardKind::Product),
            any_title: Some("Boya".to_string()),
            any_price: Some("300".to_string()),
            ..RenderedCard::default()
        }];
        // Port 9 (discard) on localhost: connection refused
        let page = url("http://127.0.0.1:9/index.html");
        let catalog = CatalogCache::new(&page, Arc::new(cards)).expect("catalog");

        let first = catalog.products().await;
        assert_eq!(first.as_slice(), &[Product::new("1", "Boya", 300)]);

        let second = catalog.products().await;
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_unreachable_source_with_empty_page() {
        let page = url("http://127.0.0.1:9/pages/x.html");
        let catalog = CatalogCache::new(&page, Arc::new(EmptyPage)).expect("catalog");
        assert!(catalog.products().await.is_empty());
    }
}
