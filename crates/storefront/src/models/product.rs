//! Product domain types.

use serde::{Deserialize, Serialize};

use apex_core::{Price, ProductId, Sizes};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Image URL or path, rendered as-is by clients.
    pub image: String,
    /// Sellable units. Only order placement decrements it.
    pub stock: u32,
    pub sizes: Sizes,
    /// Marks the product for promotional display.
    pub featured: bool,
}

/// Admin payload for creating or replacing a product.
///
/// Price and sizes are validated while deserializing; the catalog service
/// checks the rest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    pub stock: u32,
    pub sizes: Sizes,
    #[serde(default)]
    pub featured: bool,
}
