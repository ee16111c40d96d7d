//! Page-side collaborators: text targets written by the cart and catalog
//! cards read by it.
//!
//! Rendering the catalog page is someone else's job. The cart only needs
//! somewhere to write counter text ([`TextTarget`]) and a way to read the
//! cards already on the page ([`CardSource`]). [`HtmlCatalogPage`] provides
//! the latter over rendered HTML.

use std::ops::Range;
use std::sync::{LazyLock, RwLock};

use regex::Regex;

// =============================================================================
// Text targets
// =============================================================================

/// An element whose text the cart overwrites (e.g. a quantity badge).
pub trait TextTarget: Send + Sync {
    fn set_text(&self, text: &str);
}

/// A text target that just remembers what was written.
#[derive(Debug, Default)]
pub struct TextSlot {
    text: RwLock<String>,
}

impl TextSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> String {
        self.text.read().map(|t| t.clone()).unwrap_or_default()
    }
}

impl TextTarget for TextSlot {
    fn set_text(&self, text: &str) {
        if let Ok(mut current) = self.text.write() {
            text.clone_into(&mut current);
        }
    }
}

// =============================================================================
// Rendered catalog cards
// =============================================================================

/// Marker class a catalog card was matched by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    /// `.product`
    Product,
    /// `.card`
    Card,
    /// `.producto`
    Producto,
    /// `.item`
    Item,
}

impl CardKind {
    fn from_classes(classes: &[String]) -> Option<Self> {
        [
            ("product", Self::Product),
            ("card", Self::Card),
            ("producto", Self::Producto),
            ("item", Self::Item),
        ]
        .into_iter()
        .find(|(class, _)| classes.iter().any(|c| c == class))
        .map(|(_, kind)| kind)
    }
}

/// Text and controls found inside one rendered card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedCard {
    pub kind: Option<CardKind>,
    /// Text of the first `.card-title` or `h3`.
    pub title: Option<String>,
    /// Text of the first `.card-title`, `h3`, `h4` or `.nombre`.
    pub any_title: Option<String>,
    /// Text of the first `.price`.
    pub price: Option<String>,
    /// Text of the first `.price` or `.precio`.
    pub any_price: Option<String>,
    /// Card has an `.add-to-cart` control.
    pub has_add_button: bool,
    /// Card has a `.buy-now` control.
    pub has_buy_button: bool,
}

impl RenderedCard {
    /// `.product` and `.card` elements carry cart buttons; the other kinds
    /// are only read when scanning for products.
    #[must_use]
    pub const fn is_shop_card(&self) -> bool {
        matches!(self.kind, Some(CardKind::Product | CardKind::Card))
    }
}

/// Something that can list the catalog cards currently rendered.
pub trait CardSource: Send + Sync {
    fn cards(&self) -> Vec<RenderedCard>;
}

impl CardSource for Vec<RenderedCard> {
    fn cards(&self) -> Vec<RenderedCard> {
        self.clone()
    }
}

/// A page with no cards.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyPage;

impl CardSource for EmptyPage {
    fn cards(&self) -> Vec<RenderedCard> {
        Vec::new()
    }
}

// =============================================================================
// HtmlCatalogPage
// =============================================================================

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9-]*)([^>]*)>").expect("Invalid regex")
});

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid regex")
});

static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// An element with its class list and the byte range of its content.
#[derive(Debug)]
struct Element {
    name: String,
    classes: Vec<String>,
    content: Range<usize>,
}

impl Element {
    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

/// Catalog cards read from rendered HTML.
///
/// This is a tolerant tag scanner, not a full HTML parser: it pairs opening
/// and closing tags, skips void elements, and treats unclosed elements as
/// running to the end of the document.
#[derive(Debug, Clone)]
pub struct HtmlCatalogPage {
    html: String,
}

impl HtmlCatalogPage {
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    fn elements(&self) -> Vec<Element> {
        let mut elements: Vec<Element> = Vec::new();
        // (tag name, index into `elements`)
        let mut open: Vec<(String, usize)> = Vec::new();

        for caps in TAG_RE.captures_iter(&self.html) {
            let Some(whole) = caps.get(0) else { continue };
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let name = caps
                .get(2)
                .map(|m| m.as_str().to_ascii_lowercase())
                .unwrap_or_default();
            let attrs = caps.get(3).map_or("", |m| m.as_str());

            if closing {
                if let Some(pos) = open.iter().rposition(|(n, _)| *n == name) {
                    for (_, idx) in open.drain(pos..) {
                        if let Some(el) = elements.get_mut(idx) {
                            el.content.end = whole.start();
                        }
                    }
                }
                continue;
            }

            elements.push(Element {
                classes: parse_classes(attrs),
                content: whole.end()..self.html.len(),
                name: name.clone(),
            });

            let self_closing = attrs.trim_end().ends_with('/');
            if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
                open.push((name, elements.len() - 1));
            }
        }

        elements
    }

    fn text_of(&self, el: &Element) -> Option<String> {
        let inner = self.html.get(el.content.clone())?;
        let text = decode_entities(&MARKUP_RE.replace_all(inner, " "));
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        (!text.is_empty()).then_some(text)
    }
}

impl CardSource for HtmlCatalogPage {
    fn cards(&self) -> Vec<RenderedCard> {
        let elements = self.elements();

        let first_text = |within: &Range<usize>, pred: &dyn Fn(&Element) -> bool| {
            elements
                .iter()
                .filter(|el| el.content.start > within.start && el.content.end <= within.end)
                .find(|&el| pred(el))
                .and_then(|el| self.text_of(el))
        };
        let any_within = |within: &Range<usize>, class: &str| {
            elements.iter().any(|el| {
                el.content.start > within.start
                    && el.content.end <= within.end
                    && el.has_class(class)
            })
        };

        elements
            .iter()
            .filter_map(|card| {
                let kind = CardKind::from_classes(&card.classes)?;
                let within = &card.content;
                Some(RenderedCard {
                    kind: Some(kind),
                    title: first_text(within, &|el: &Element| {
                        el.has_class("card-title") || el.is("h3")
                    }),
                    any_title: first_text(within, &|el: &Element| {
                        el.has_class("card-title")
                            || el.is("h3")
                            || el.is("h4")
                            || el.has_class("nombre")
                    }),
                    price: first_text(within, &|el: &Element| el.has_class("price")),
                    any_price: first_text(within, &|el: &Element| {
                        el.has_class("price") || el.has_class("precio")
                    }),
                    has_add_button: any_within(within, "add-to-cart"),
                    has_buy_button: any_within(within, "buy-now"),
                })
            })
            .collect()
    }
}

fn parse_classes(attrs: &str) -> Vec<String> {
    CLASS_RE
        .captures(attrs)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
