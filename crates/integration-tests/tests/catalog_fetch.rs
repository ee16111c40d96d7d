//! Product list fetched from a local static server.
//!
//! A `tower-http` `ServeDir` stands in for the site hosting `products.json`.

use std::sync::Arc;

use tackle_core::{Price, Product, ProductId};
use tackle_integration_tests::{TestShop, serve_static};
use tackle_storefront::notify::Severity;
use tackle_storefront::page::{EmptyPage, HtmlCatalogPage};
use tackle_storefront::search::SearchOutcome;
use url::Url;

const PRODUCTS: &str = r#"[
    {"id": 1, "name": "Caña Telescópica", "price": 15000},
    {"id": "2", "name": "Reel Frontal", "price": "8500"},
    {"id": 3, "name": "Caja de Señuelos", "price": 4200.5}
]"#;

const FALLBACK_PAGE: &str = r#"
    <div class="product"><h3>Boya Luminosa</h3><span class="price">$300</span></div>
    <div class="producto"><span class="nombre">Plomada</span><span class="precio">$ 150</span></div>
"#;

fn site_with_products() -> tempfile::TempDir {
    let site = tempfile::tempdir().expect("tempdir");
    std::fs::write(site.path().join("products.json"), PRODUCTS).expect("write products");
    std::fs::create_dir(site.path().join("pages")).expect("mkdir pages");
    site
}

fn page(addr: std::net::SocketAddr, path: &str) -> Url {
    Url::parse(&format!("http://{addr}{path}")).expect("url")
}

#[tokio::test]
async fn test_fetches_products_from_site_root() {
    let site = site_with_products();
    let addr = serve_static(site.path()).await;
    let shop = TestShop::open(page(addr, "/index.html"), Arc::new(EmptyPage));

    let products = shop.storefront.catalog().products().await;
    assert_eq!(products.len(), 3);
    assert_eq!(products[0], Product::new("1", "Caña Telescópica", 15000));
    assert_eq!(products[1].price, Price::from(8500));
    assert_eq!(products[2].price.to_string(), "4200.5");
}

#[tokio::test]
async fn test_subsection_page_looks_one_level_up() {
    let site = site_with_products();
    let addr = serve_static(site.path()).await;
    let shop = TestShop::open(page(addr, "/pages/reels.html"), Arc::new(EmptyPage));

    assert_eq!(
        shop.storefront.catalog().products_url().path(),
        "/products.json"
    );
    assert_eq!(shop.storefront.catalog().products().await.len(), 3);
}

#[tokio::test]
async fn test_product_list_is_fetched_once() {
    let site = site_with_products();
    let addr = serve_static(site.path()).await;
    let shop = TestShop::open(page(addr, "/index.html"), Arc::new(EmptyPage));

    let first = shop.storefront.catalog().products().await;
    std::fs::remove_file(site.path().join("products.json")).expect("remove products");

    let second = shop.storefront.catalog().products().await;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 3);
}

#[tokio::test]
async fn test_missing_list_falls_back_to_page_cards() {
    let site = tempfile::tempdir().expect("tempdir");
    let addr = serve_static(site.path()).await;
    let cards = Arc::new(HtmlCatalogPage::new(FALLBACK_PAGE));
    let shop = TestShop::open(page(addr, "/index.html"), cards);

    let products = shop.storefront.catalog().products().await;
    assert_eq!(
        products.as_slice(),
        &[
            Product::new("1", "Boya Luminosa", 300),
            Product::new("2", "Plomada", 150),
        ]
    );
}

#[tokio::test]
async fn test_search_and_add_result() {
    let site = site_with_products();
    let addr = serve_static(site.path()).await;
    let shop = TestShop::open(page(addr, "/index.html"), Arc::new(EmptyPage));
    let search = shop.storefront.search();

    let (outcome, html) = search.run("  CAÑA ").await.expect("search");
    let SearchOutcome::Results(results) = outcome else {
        panic!("expected results");
    };
    assert_eq!(results.len(), 1);
    assert!(html.expect("html").contains(r#"data-id="1""#));

    assert!(search.add_result(&ProductId::new("1")).await);
    let cart = shop.storefront.cart().cart();
    assert_eq!(cart.items()[0].id.as_str(), "1");
    assert_eq!(shop.counter.text(), "1");

    search.run("anzuelo").await.expect("search");
    let notice = shop.notifier.last().expect("notice");
    assert_eq!(notice.severity, Severity::Warning);
    assert_eq!(notice.text, "No results found for \"anzuelo\".");
}
