//! Catalog products as listed in `products.json`.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A catalog record: `{id, name, price}`.
///
/// The `id` may be a JSON string or number; it is kept as a string and
/// compared as one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "lenient_product_id")]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Price,
}

impl Product {
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: impl Into<Price>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
        }
    }

    /// Case-insensitive substring match on the product name.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

fn lenient_product_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ProductId, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(ProductId::new(s)),
        serde_json::Value::Number(n) => Ok(ProductId::new(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "product id must be a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_numeric_and_string_ids() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[
                {"id": 7, "name": "Caña Telescópica", "price": 15000},
                {"id": "reel-2", "name": "Reel", "price": "8500"}
            ]"#,
        )
        .expect("valid catalog");

        assert_eq!(products[0].id.as_str(), "7");
        assert_eq!(products[0].price, Price::from(15000));
        assert_eq!(products[1].id.as_str(), "reel-2");
        assert_eq!(products[1].price, Price::from(8500));
    }

    #[test]
    fn test_missing_price_defaults_to_zero() {
        let product: Product =
            serde_json::from_str(r#"{"id": 1, "name": "Boya"}"#).expect("valid product");
        assert_eq!(product.price, Price::ZERO);
    }

    #[test]
    fn test_rejects_object_id() {
        let result = serde_json::from_str::<Product>(r#"{"id": {}, "name": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_name_matches_is_case_insensitive() {
        let product = Product::new("1", "Señuelo RAPALA", 900);
        assert!(product.name_matches("rapala"));
        assert!(product.name_matches("señuelo"));
        assert!(!product.name_matches("caña"));
    }
}
