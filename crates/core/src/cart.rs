//! Shopping cart kept by the client between visits.
//!
//! The cart is plain state owned by one client session. It is persisted as a
//! versioned JSON document so the layout can evolve without silently
//! misreading old carts:
//!
//! ```json
//! {"version": 1, "items": [{"productId": 1, "name": "...", "price": "3200000",
//!   "image": "...", "quantity": 2, "size": "42"}]}
//! ```
//!
//! Prices in the cart are display copies; checkout sends only
//! [`LineItem`]s and the store prices them itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{LineItem, Price, ProductId};

/// Errors reading a persisted cart.
#[derive(thiserror::Error, Debug)]
pub enum CartError {
    /// The document was written by a different cart layout.
    #[error("unsupported cart version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
        /// Version this build reads and writes.
        expected: u32,
    },
    /// The document is not valid cart JSON.
    #[error("malformed cart document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A product in the cart, with the details needed to render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub quantity: u32,
    pub size: String,
}

impl CartItem {
    fn is_variant(&self, product_id: ProductId, size: &str) -> bool {
        self.product_id == product_id && self.size == size
    }
}

/// The client's cart: at most one entry per (product, size).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

#[derive(Serialize)]
struct StoredCartRef<'a> {
    version: u32,
    items: &'a [CartItem],
}

#[derive(Deserialize)]
struct StoredCart {
    version: u32,
    #[serde(default)]
    items: serde_json::Value,
}

impl Cart {
    /// Layout version written by [`Cart::to_json`].
    pub const SCHEMA_VERSION: u32 = 1;

    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Entries in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item, summing quantities if the variant is already present.
    ///
    /// Items with a zero quantity are ignored.
    pub fn add(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }
        match self
            .items
            .iter_mut()
            .find(|existing| existing.is_variant(item.product_id, &item.size))
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => self.items.push(item),
        }
    }

    /// Remove a variant. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: ProductId, size: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| !item.is_variant(product_id, size));
        self.items.len() != before
    }

    /// Set a variant's quantity, clamped to at least 1.
    ///
    /// Returns whether the variant was in the cart.
    pub fn update_quantity(&mut self, product_id: ProductId, size: &str, quantity: u32) -> bool {
        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.is_variant(product_id, size))
        else {
            return false;
        };
        item.quantity = quantity.max(1);
        true
    }

    /// Empty the cart, typically after a successful checkout.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of displayed price × quantity, or `None` if it overflows a decimal.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |sum, item| {
            let line = item.price.times(item.quantity)?;
            sum.checked_add(line.amount())
        })
    }

    /// The lines to submit at checkout.
    #[must_use]
    pub fn to_order_lines(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .map(|item| LineItem {
                product_id: item.product_id,
                size: item.size.clone(),
                quantity: item.quantity,
            })
            .collect()
    }

    /// Serialize to the versioned storage document.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization itself fails.
    pub fn to_json(&self) -> Result<String, CartError> {
        Ok(serde_json::to_string(&StoredCartRef {
            version: Self::SCHEMA_VERSION,
            items: &self.items,
        })?)
    }

    /// Restore a cart from its storage document.
    ///
    /// Entries are re-added one by one, so duplicates merge and zero
    /// quantities are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnsupportedVersion`] for any other layout version
    /// and [`CartError::Malformed`] for invalid JSON.
    pub fn from_json(json: &str) -> Result<Self, CartError> {
        let stored: StoredCart = serde_json::from_str(json)?;
        if stored.version != Self::SCHEMA_VERSION {
            return Err(CartError::UnsupportedVersion {
                found: stored.version,
                expected: Self::SCHEMA_VERSION,
            });
        }

        let items: Vec<CartItem> = if stored.items.is_null() {
            Vec::new()
        } else {
            serde_json::from_value(stored.items)?
        };

        let mut cart = Self::new();
        for item in items {
            cart.add(item);
        }
        Ok(cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(product: i64, size: &str, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(product),
            name: format!("Apex Sneakers {product}"),
            price: "3200000".parse().unwrap(),
            image: String::new(),
            quantity,
            size: size.to_owned(),
        }
    }

    #[test]
    fn test_add_merges_same_variant() {
        let mut cart = Cart::new();
        cart.add(item(1, "42", 1));
        cart.add(item(1, "42", 2));
        cart.add(item(1, "43", 1));
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items().first().map(|i| i.quantity), Some(3));
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_add_ignores_zero_quantity() {
        let mut cart = Cart::new();
        cart.add(item(1, "42", 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_only_matching_variant() {
        let mut cart = Cart::new();
        cart.add(item(1, "42", 1));
        cart.add(item(1, "43", 1));
        assert!(cart.remove(ProductId::new(1), "42"));
        assert!(!cart.remove(ProductId::new(1), "42"));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add(item(1, "42", 3));
        assert!(cart.update_quantity(ProductId::new(1), "42", 0));
        assert_eq!(cart.item_count(), 1);
        assert!(!cart.update_quantity(ProductId::new(9), "42", 2));
    }

    #[test]
    fn test_subtotal_and_lines() {
        let mut cart = Cart::new();
        cart.add(item(1, "42", 2));
        cart.add(item(2, "40", 1));
        assert_eq!(cart.subtotal(), Some(Decimal::from(9_600_000)));

        let lines = cart.to_order_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.first().map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(item(1, "42", 2));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_json_document_round_trip() {
        let mut cart = Cart::new();
        cart.add(item(1, "42", 2));
        let json = cart.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["items"][0]["productId"], 1);

        assert_eq!(Cart::from_json(&json).unwrap(), cart);
    }

    #[test]
    fn test_from_json_rejects_other_versions() {
        let err = Cart::from_json(r#"{"version": 2, "items": []}"#).unwrap_err();
        assert!(matches!(
            err,
            CartError::UnsupportedVersion {
                found: 2,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_from_json_normalizes_entries() {
        let json = r#"{"version": 1, "items": [
            {"productId": 1, "name": "A", "price": 100, "image": "", "quantity": 1, "size": "40"},
            {"productId": 1, "name": "A", "price": 100, "image": "", "quantity": 2, "size": "40"},
            {"productId": 2, "name": "B", "price": 100, "image": "", "quantity": 0, "size": "40"}
        ]}"#;
        let cart = Cart::from_json(json).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Cart::from_json("not json"),
            Err(CartError::Malformed(_))
        ));
    }

    #[test]
    fn test_subtotal_reports_overflow() {
        let huge = r#"{"version":1,"items":[{"productId":1,"name":"Vault","price":"70000000000000000000000000000","image":"","quantity":2,"size":"42"}]}"#;
        let cart = Cart::from_json(huge).unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.subtotal(), None);

        let pair = r#"{"version":1,"items":[
            {"productId":1,"name":"A","price":"50000000000000000000000000000","image":"","quantity":1,"size":"42"},
            {"productId":2,"name":"B","price":"50000000000000000000000000000","image":"","quantity":1,"size":"42"}
        ]}"#;
        assert_eq!(Cart::from_json(pair).unwrap().subtotal(), None);
    }
}
