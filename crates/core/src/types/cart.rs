//! Cart line items and the persisted cart document.
//!
//! The persisted form is a JSON array of
//! `{id, name, unitPrice, quantity}` objects. Decoding is fail-soft: the
//! caller always gets a [`Cart`], with [`CartDecode`] telling it whether the
//! stored value was absent, usable or corrupted.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::id::ItemId;
use super::price::Price;
use super::product::Product;

/// One persisted cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub unit_price: Price,
    /// Always at least 1; stored values below that decode as 1.
    #[serde(default = "one", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

const fn one() -> u32 {
    1
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let quantity = match &value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f.trunc() as u64)),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(quantity
        .filter(|q| *q >= 1)
        .map_or(1, |q| u32::try_from(q).unwrap_or(u32::MAX)))
}

/// Input for adding a product to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
}

impl NewItem {
    #[must_use]
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: impl Into<Price>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
        }
    }
}

impl From<&Product> for NewItem {
    fn from(product: &Product) -> Self {
        Self {
            id: ItemId::new(product.id.as_str()),
            name: product.name.clone(),
            price: product.price,
        }
    }
}

/// Why a stored cart could not be used.
#[derive(Debug, Error)]
pub enum CartDecodeError {
    #[error("stored cart is not valid JSON: {0}")]
    Syntax(serde_json::Error),
    #[error("stored cart has the wrong shape: {0}")]
    Shape(serde_json::Error),
}

/// Result of decoding a stored cart value.
#[derive(Debug)]
pub enum CartDecode {
    /// Nothing was stored (or `null` was).
    Absent,
    /// A well-formed cart.
    Loaded(Cart),
    /// The stored value was unusable.
    Corrupted(CartDecodeError),
}

impl CartDecode {
    /// The decoded cart, or an empty cart for absent and corrupted values.
    #[must_use]
    pub fn into_cart(self) -> Cart {
        match self {
            Self::Loaded(cart) => cart,
            Self::Absent | Self::Corrupted(_) => Cart::default(),
        }
    }
}

/// The ordered set of line items, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from items, merging duplicate ids into the first
    /// occurrence by summing quantities.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if let Some(existing) = cart.get_mut(&item.id) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                cart.items.push(item);
            }
        }
        cart
    }

    /// Decode a stored value.
    #[must_use]
    pub fn decode(raw: Option<&str>) -> CartDecode {
        let Some(raw) = raw else {
            return CartDecode::Absent;
        };

        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => return CartDecode::Corrupted(CartDecodeError::Syntax(e)),
        };
        if value.is_null() {
            return CartDecode::Absent;
        }

        match serde_json::from_value::<Vec<LineItem>>(value) {
            Ok(items) => CartDecode::Loaded(Self::from_items(items)),
            Err(e) => CartDecode::Corrupted(CartDecodeError::Shape(e)),
        }
    }

    /// Encode for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Append a new line with quantity 1, or bump the quantity of the line
    /// already carrying this id.
    pub fn add(&mut self, item: NewItem) {
        if let Some(existing) = self.get_mut(&item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(LineItem {
                id: item.id,
                name: item.name,
                unit_price: item.price,
                quantity: 1,
            });
        }
    }

    /// Remove the line with this id, returning it if present.
    pub fn remove(&mut self, id: &ItemId) -> Option<LineItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `unitPrice * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::subtotal).sum()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
