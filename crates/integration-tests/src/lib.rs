//! Integration tests for Tackle Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tackle-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart operations over file-backed storage
//! - `catalog_fetch` - Product list fetched from a local static server
//!
//! Everything runs against temporary directories and a server bound to an
//! ephemeral localhost port; no external services are needed.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tackle_storefront::config::StorefrontConfig;
use tackle_storefront::notify::RecordingNotifier;
use tackle_storefront::page::{CardSource, TextSlot, TextTarget};
use tackle_storefront::{PageParts, Storefront};
use tempfile::TempDir;
use tower_http::services::ServeDir;
use url::Url;

/// A storefront over a temporary storage directory, with a recording
/// notifier and one counter.
pub struct TestShop {
    pub dir: TempDir,
    pub config: StorefrontConfig,
    pub notifier: Arc<RecordingNotifier>,
    pub counter: Arc<TextSlot>,
    pub storefront: Storefront,
}

impl TestShop {
    /// Open a shop at `page_url` with the given page cards.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or storefront cannot be created.
    #[must_use]
    pub fn open(page_url: Url, cards: Arc<dyn CardSource>) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = StorefrontConfig::with_storage_dir(dir.path())
            .expect("Failed to build config")
            .at_page(page_url);
        let (notifier, counter, storefront) = open_storefront(&config, cards);
        Self {
            dir,
            config,
            notifier,
            counter,
            storefront,
        }
    }

    /// Open a second storefront over the same storage, as a page reload
    /// would.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be created.
    #[must_use]
    pub fn reload(&self, cards: Arc<dyn CardSource>) -> (Arc<TextSlot>, Storefront) {
        let (_, counter, storefront) = open_storefront(&self.config, cards);
        (counter, storefront)
    }
}

fn open_storefront(
    config: &StorefrontConfig,
    cards: Arc<dyn CardSource>,
) -> (Arc<RecordingNotifier>, Arc<TextSlot>, Storefront) {
    let notifier = Arc::new(RecordingNotifier::answering(true));
    let counter = Arc::new(TextSlot::new());
    let parts = PageParts {
        cards,
        counters: vec![counter.clone() as Arc<dyn TextTarget>],
        notifier: notifier.clone(),
    };
    let storefront = Storefront::from_config(config, parts).expect("Failed to open storefront");
    (notifier, counter, storefront)
}

/// Serve `root` as static files on an ephemeral localhost port.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn serve_static(root: &Path) -> SocketAddr {
    let app = Router::new().fallback_service(ServeDir::new(root));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}
