//! Type-safe price representation using decimal arithmetic.
//!
//! Prices arrive from loosely typed sources (stored carts, `products.json`,
//! rendered catalog cards) so every constructor here coerces instead of
//! failing: anything that is not a usable non-negative number becomes zero.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fraction digits kept when formatting for display.
const LOCALE_FRACTION_DIGITS: u32 = 3;

/// A non-negative unit price.
///
/// Serialized as a plain JSON number (`1500`, `19.99`). Amounts a JSON
/// number cannot carry exactly are written as a numeric string instead,
/// which deserializes back to the same price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount, clamping negatives to zero.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        if amount.is_sign_negative() {
            Self::ZERO
        } else {
            Self(amount.normalize())
        }
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse a numeric string, falling back to zero.
    ///
    /// Surrounding whitespace is ignored and an empty string is zero.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        let text = text.trim();
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_or(Self::ZERO, Self::new)
    }

    /// Parse a displayed price by keeping only its ASCII digits.
    ///
    /// `"$ 1.500"` becomes `1500`. Text without digits is zero.
    #[must_use]
    pub fn from_digits(text: &str) -> Self {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Self::ZERO;
        }
        Decimal::from_str(&digits).map_or(Self::ZERO, Self::new)
    }

    /// Coerce an arbitrary JSON value into a price.
    ///
    /// Numbers and numeric strings are accepted; everything else is zero.
    #[must_use]
    pub fn coerce(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => Self::parse_lenient(&n.to_string()),
            serde_json::Value::String(s) => Self::parse_lenient(s),
            _ => Self::ZERO,
        }
    }

    /// The largest representable price. Arithmetic saturates here.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Price of `quantity` units, saturating at [`Price::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map_or(Self::MAX, Self)
    }

    /// Format with `es-AR` conventions: `.` groups thousands, `,` separates
    /// at most three fraction digits.
    ///
    /// ```rust
    /// # use tackle_core::Price;
    /// assert_eq!(Price::from(3000).to_locale_string(), "3.000");
    /// assert_eq!(Price::parse_lenient("1234.5").to_locale_string(), "1.234,5");
    /// ```
    #[must_use]
    pub fn to_locale_string(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(LOCALE_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
            .to_string();

        let (int_part, frac_part) = rounded
            .split_once('.')
            .map_or((rounded.as_str(), None), |(i, f)| (i, Some(f)));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        match frac_part {
            Some(frac) => format!("{grouped},{frac}"),
            None => grouped,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<u32> for Price {
    fn from(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl From<i32> for Price {
    fn from(amount: i32) -> Self {
        Self::new(Decimal::from(amount))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.0.checked_add(rhs.0).map_or(Self::MAX, Self)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let amount = self.0.normalize();
        if amount.fract().is_zero()
            && let Some(whole) = amount.to_u64()
        {
            return serializer.serialize_u64(whole);
        }
        // Only emit a float when it reads back as the same amount
        match amount.to_f64() {
            Some(float) if Decimal::from_str(&float.to_string()).is_ok_and(|d| d == amount) => {
                serializer.serialize_f64(float)
            }
            _ => serializer.serialize_str(&amount.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::coerce(&value))
    }
}
