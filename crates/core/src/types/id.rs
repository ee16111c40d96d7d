//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing cart item ids with catalog product ids.

use std::fmt::Display;

/// Maximum length, in characters, of a derived cart item id.
pub const MAX_ID_LEN: usize = 64;

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use tackle_core::define_id;
/// define_id!(OrderRef);
/// define_id!(CouponCode);
///
/// let order = OrderRef::new("o-1");
/// let coupon = CouponCode::new("o-1");
///
/// // These are different types, so this won't compile:
/// // let _: OrderRef = coupon;
/// assert_eq!(order.as_str(), coupon.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Identity of a cart line
define_id!(ItemId);
// Identity of a catalog record in products.json
define_id!(ProductId);

/// Derive the cart identity of a product from its display name and price.
///
/// The name and price are joined with `|`, lowercased, runs of whitespace
/// collapse to a single `-` and the result is cut to [`MAX_ID_LEN`]
/// characters. Two products sharing name and price share an id.
///
/// ```rust
/// # use tackle_core::make_id;
/// assert_eq!(make_id("Caña  Pro", 1500).as_str(), "caña-pro|1500");
/// ```
pub fn make_id(name: impl Display, price: impl Display) -> ItemId {
    let joined = format!("{name}|{price}").to_lowercase();

    let mut id = String::with_capacity(joined.len());
    let mut in_whitespace = false;
    for ch in joined.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                id.push('-');
            }
            in_whitespace = true;
        } else {
            id.push(ch);
            in_whitespace = false;
        }
    }

    ItemId(id.chars().take(MAX_ID_LEN).collect())
}
