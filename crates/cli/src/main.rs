//! Tackle Shop CLI - the storefront cart, search and catalog from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the cart and show it
//! tackle cart add "Caña Telescópica" 15000
//! tackle cart show
//!
//! # Change quantities, then check out
//! tackle cart inc "caña-telescópica|15000"
//! tackle cart checkout
//!
//! # Search the product list, adding a result by its catalog id
//! tackle search reel --add 2
//!
//! # List the catalog cards of a rendered page
//! tackle catalog scan public/index.html
//! ```
//!
//! # Commands
//!
//! - `cart` - Show, edit, render and check out the persisted cart
//! - `buy` - Buy a single product now
//! - `search` - Search the product list
//! - `catalog scan` - Read products from a rendered page
//!
//! Configuration is read from the environment (`TACKLE_STORAGE_DIR`,
//! `TACKLE_ORIGIN`, `TACKLE_PAGE_URL`), see `tackle_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tackle_core::Price;

mod commands;

#[derive(Parser)]
#[command(name = "tackle")]
#[command(author, version, about = "Tackle Shop storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Buy a product now, completing the purchase immediately
    Buy {
        /// Product name as shown on its card
        name: String,

        /// Product price
        #[arg(value_parser = parse_price)]
        price: Price,
    },
    /// Search the product list by name
    Search {
        /// Text to look for in product names
        query: String,

        /// Add the result with this catalog id to the cart
        #[arg(long)]
        add: Option<String>,

        /// Rendered page used when the product list cannot be fetched
        #[arg(long)]
        page: Option<PathBuf>,
    },
    /// Inspect catalog pages
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart lines, item count and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product name as shown on its card
        name: String,

        /// Product price
        #[arg(value_parser = parse_price)]
        price: Price,
    },
    /// Increase a line's quantity by one
    Inc {
        /// Cart line id
        id: String,
    },
    /// Decrease a line's quantity by one, removing it at zero
    Dec {
        /// Cart line id
        id: String,
    },
    /// Remove a line
    Remove {
        /// Cart line id
        id: String,
    },
    /// Empty the cart
    Clear {
        /// Confirm emptying the cart
        #[arg(short, long)]
        yes: bool,
    },
    /// Complete the purchase of everything in the cart
    Checkout,
    /// Print the cart modal HTML
    Render,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List the products found on a rendered page
    Scan {
        /// Path to the page's HTML
        html: PathBuf,
    },
}

/// Prices are plain numbers such as `15000` or `1499.90`.
fn parse_price(text: &str) -> Result<Price, String> {
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return Err(format!("not a price: {text:?}"));
    }
    Ok(Price::parse_lenient(text))
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tackle_cli=info,tackle_storefront=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show()?,
            CartAction::Add { name, price } => commands::cart::add(&name, price)?,
            CartAction::Inc { id } => commands::cart::change(&id, 1)?,
            CartAction::Dec { id } => commands::cart::change(&id, -1)?,
            CartAction::Remove { id } => commands::cart::remove(&id)?,
            CartAction::Clear { yes } => commands::cart::clear(yes)?,
            CartAction::Checkout => commands::cart::checkout()?,
            CartAction::Render => commands::cart::render()?,
        },
        Commands::Buy { name, price } => commands::cart::buy(&name, price)?,
        Commands::Search { query, add, page } => {
            commands::search::run(&query, add.as_deref(), page.as_deref()).await?;
        }
        Commands::Catalog { action } => match action {
            CatalogAction::Scan { html } => commands::catalog::scan(&html)?,
        },
    }
    Ok(())
}
