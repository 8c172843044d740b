//! Delivery address captured at checkout.

use serde::{Deserialize, Serialize};

/// A shipping field failed validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("shipping {field} cannot be blank")]
pub struct ShippingError {
    /// Wire name of the offending field.
    pub field: &'static str,
}

/// Recipient and address for an order.
///
/// Stored verbatim with the order as a JSON document; the store never reads
/// individual fields back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingInfo {
    /// Check every field is present, returning a trimmed copy.
    ///
    /// # Errors
    ///
    /// Returns a [`ShippingError`] naming the first blank field.
    pub fn validated(&self) -> Result<Self, ShippingError> {
        let field = |name: &'static str, value: &str| {
            let value = value.trim();
            if value.is_empty() {
                Err(ShippingError { field: name })
            } else {
                Ok(value.to_owned())
            }
        };

        Ok(Self {
            first_name: field("firstName", &self.first_name)?,
            last_name: field("lastName", &self.last_name)?,
            address: field("address", &self.address)?,
            city: field("city", &self.city)?,
            postal_code: field("postalCode", &self.postal_code)?,
            country: field("country", &self.country)?,
        })
    }
}

#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for ShippingInfo {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for ShippingInfo {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(serde_json::from_str(&s)?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for ShippingInfo {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        let json = serde_json::to_string(self)?;
        <String as sqlx::Encode<sqlx::Sqlite>>::encode(json, buf)
    }
}
