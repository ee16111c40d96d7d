//! Product search over the catalog list.
//!
//! Matching is a case-insensitive substring test on product names. The
//! product list comes from [`CatalogCache`], so the first search triggers
//! the fetch and later searches reuse it.

use std::sync::Arc;

use askama::Template;
use tackle_core::{NewItem, Product, ProductId};
use tracing::{debug, instrument, warn};

use crate::cart::CartService;
use crate::catalog::CatalogCache;
use crate::notify::{Notice, SharedNotifier};

const EMPTY_QUERY_TEXT: &str = "Please type a product to search.";

/// Result of matching a query against the product list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was blank after trimming.
    EmptyQuery,
    /// Nothing matched the normalized query.
    NoResults(String),
    Results(Vec<Product>),
}

/// Normalize a raw query: trimmed and lowercased.
#[must_use]
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Match `raw` against `products`, keeping catalog order.
#[must_use]
pub fn search(products: &[Product], raw: &str) -> SearchOutcome {
    let query = normalize_query(raw);
    if query.is_empty() {
        return SearchOutcome::EmptyQuery;
    }

    let results: Vec<Product> = products
        .iter()
        .filter(|product| product.name_matches(&query))
        .cloned()
        .collect();

    if results.is_empty() {
        SearchOutcome::NoResults(query)
    } else {
        SearchOutcome::Results(results)
    }
}

/// Search results template.
#[derive(Template)]
#[template(path = "search/results.html")]
pub struct SearchResultsTemplate {
    pub results: Vec<Product>,
}

/// The search box and its result list.
#[derive(Clone)]
pub struct SearchPanel {
    catalog: CatalogCache,
    service: CartService,
    notifier: SharedNotifier,
}

impl SearchPanel {
    #[must_use]
    pub fn new(catalog: CatalogCache, service: CartService, notifier: SharedNotifier) -> Self {
        Self {
            catalog,
            service,
            notifier,
        }
    }

    /// Run a search, notifying on blank queries and empty results.
    ///
    /// A blank query is answered without loading the product list.
    ///
    /// Returns the outcome together with the rendered result list, which is
    /// only present when something matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the result template fails to render.
    #[instrument(skip(self))]
    pub async fn run(&self, raw: &str) -> Result<(SearchOutcome, Option<String>), askama::Error> {
        if normalize_query(raw).is_empty() {
            self.notifier.notify(Notice::info(EMPTY_QUERY_TEXT));
            return Ok((SearchOutcome::EmptyQuery, None));
        }

        let products = self.catalog.products().await;
        let outcome = search(&products, raw);

        let html = match &outcome {
            SearchOutcome::EmptyQuery => None,
            SearchOutcome::NoResults(query) => {
                self.notifier
                    .notify(Notice::warning(format!("No results found for \"{query}\".")));
                None
            }
            SearchOutcome::Results(results) => {
                debug!(count = results.len(), "Search matched");
                let template = SearchResultsTemplate {
                    results: results.clone(),
                };
                Some(template.render()?)
            }
        };

        Ok((outcome, html))
    }

    /// Add the catalog product `id` from a result list to the cart.
    ///
    /// Returns `false` if no product has that id.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn add_result(&self, id: &ProductId) -> bool {
        let products: Arc<Vec<Product>> = self.catalog.products().await;
        let Some(product) = products.iter().find(|p| p.id == *id) else {
            warn!("Search result not in product list");
            return false;
        };
        self.service.add_item(NewItem::from(product));
        true
    }
}

impl std::fmt::Debug for SearchPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPanel")
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}
