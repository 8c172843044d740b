//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are exact decimals in the store's currency (VND in the default
//! catalog). They serialize as decimal strings so no precision is lost on
//! the wire, and accept either JSON strings or numbers on input.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
    /// The amount has more fractional digits than the store supports.
    #[error("price must have at most {max} decimal places")]
    TooPrecise {
        /// Maximum allowed scale.
        max: u32,
    },
    /// The input is not a decimal number.
    #[error("price is not a valid decimal number")]
    Invalid,
}

/// A strictly positive monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Maximum number of fractional digits.
    pub const MAX_SCALE: u32 = 2;

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] for zero or negative amounts and
    /// [`PriceError::TooPrecise`] for more than two fractional digits.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        let amount = amount.normalize();
        if amount.scale() > Self::MAX_SCALE {
            return Err(PriceError::TooPrecise {
                max: Self::MAX_SCALE,
            });
        }
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, or `None` for a zero quantity or overflow.
    #[must_use]
    pub fn times(self, quantity: u32) -> Option<Self> {
        if quantity == 0 {
            return None;
        }
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Sum of two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid)?;
        Self::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Stored as TEXT so SQLite never rounds through a float.
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Price {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Price {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(s.parse::<Self>()?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Sqlite>>::encode(self.0.to_string(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        s.parse().unwrap()
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        assert_eq!(Price::new(Decimal::ZERO), Err(PriceError::NotPositive));
        assert_eq!(Price::new(Decimal::from(-5)), Err(PriceError::NotPositive));
    }

    #[test]
    fn test_rejects_sub_cent_amounts() {
        assert_eq!(
            "19.999".parse::<Price>(),
            Err(PriceError::TooPrecise { max: 2 })
        );
        // Trailing zeros are not extra precision
        assert_eq!(price("19.9900").amount(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!("abc".parse::<Price>(), Err(PriceError::Invalid));
    }

    #[test]
    fn test_times() {
        assert_eq!(price("3200000").times(2), Some(price("6400000")));
        assert_eq!(price("10").times(0), None);
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(
            price("2900000").checked_add(price("3200000")),
            Some(price("6100000"))
        );
    }

    #[test]
    fn test_json_accepts_strings_and_numbers() {
        let from_number: Price = serde_json::from_str("3200000").unwrap();
        let from_string: Price = serde_json::from_str("\"3200000\"").unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_str::<Price>("0").is_err());
        assert!(serde_json::from_str::<Price>("-1").is_err());
    }

    #[test]
    fn test_json_serializes_as_string() {
        assert_eq!(
            serde_json::to_string(&price("1250000.50")).unwrap(),
            "\"1250000.5\""
        );
    }
}
