//! Size labels a product is offered in.

use serde::{Deserialize, Serialize};

/// Errors that can occur when building [`Sizes`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SizesError {
    /// No size labels were given.
    #[error("a product must be offered in at least one size")]
    Empty,
    /// A label is blank after trimming.
    #[error("size labels cannot be blank")]
    BlankLabel,
    /// The same label appears twice.
    #[error("duplicate size label: {0}")]
    Duplicate(String),
}

/// Ordered, non-empty set of size labels such as `["39", "40", "41"]`.
///
/// Labels are opaque strings; `"40"` and `"M"` are equally valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Sizes(Vec<String>);

impl Sizes {
    /// Build a size list, trimming each label.
    ///
    /// # Errors
    ///
    /// Returns a [`SizesError`] if the list is empty, or a label is blank or
    /// repeated.
    pub fn new<I, S>(labels: I) -> Result<Self, SizesError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                return Err(SizesError::BlankLabel);
            }
            if out.iter().any(|existing| existing == label) {
                return Err(SizesError::Duplicate(label.to_owned()));
            }
            out.push(label.to_owned());
        }
        if out.is_empty() {
            return Err(SizesError::Empty);
        }
        Ok(Self(out))
    }

    /// Whether `label` is one of the offered sizes.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|size| size == label)
    }

    /// Iterate over the labels in their listed order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<String>> for Sizes {
    type Error = SizesError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<Sizes> for Vec<String> {
    fn from(sizes: Sizes) -> Self {
        sizes.0
    }
}

// Stored as a JSON array in a TEXT column.
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Sizes {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Sizes {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        let labels: Vec<String> = serde_json::from_str(&s)?;
        Ok(Self::new(labels)?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Sizes {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        let json = serde_json::to_string(&self.0)?;
        <String as sqlx::Encode<sqlx::Sqlite>>::encode(json, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_keeps_order() {
        let sizes = Sizes::new([" 41", "39 ", "40"]).unwrap();
        assert_eq!(sizes.iter().collect::<Vec<_>>(), ["41", "39", "40"]);
        assert!(sizes.contains("39"));
        assert!(!sizes.contains("44"));
    }

    #[test]
    fn test_new_rejects_bad_lists() {
        assert_eq!(Sizes::new(Vec::<String>::new()), Err(SizesError::Empty));
        assert_eq!(Sizes::new(["40", " "]), Err(SizesError::BlankLabel));
        assert_eq!(
            Sizes::new(["40", "41", "40"]),
            Err(SizesError::Duplicate("40".to_owned()))
        );
    }

    #[test]
    fn test_json_is_a_plain_array() {
        let sizes: Sizes = serde_json::from_str(r#"["S","M","L"]"#).unwrap();
        assert_eq!(sizes.len(), 3);
        assert_eq!(serde_json::to_string(&sizes).unwrap(), r#"["S","M","L"]"#);
        assert!(serde_json::from_str::<Sizes>("[]").is_err());
    }
}
