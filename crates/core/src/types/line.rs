//! Requested order lines.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// One requested line: a quantity of a product in a given size.
///
/// Carries no price; the store prices lines from its own catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: u32,
}

/// Collapse lines naming the same product and size into one.
///
/// Quantities are summed (saturating) and lines keep the position of their
/// first occurrence.
#[must_use]
pub fn merge_lines(lines: Vec<LineItem>) -> Vec<LineItem> {
    let mut merged: Vec<LineItem> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged
            .iter_mut()
            .find(|m| m.product_id == line.product_id && m.size == line.size)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product: i64, size: &str, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::new(product),
            size: size.to_owned(),
            quantity,
        }
    }

    #[test]
    fn test_merge_sums_same_product_and_size() {
        let merged = merge_lines(vec![line(1, "40", 1), line(2, "41", 1), line(1, "40", 2)]);
        assert_eq!(merged, vec![line(1, "40", 3), line(2, "41", 1)]);
    }

    #[test]
    fn test_merge_keeps_distinct_sizes_apart() {
        let merged = merge_lines(vec![line(1, "40", 1), line(1, "41", 1)]);
        assert_eq!(merged.len(), 2);
    }
}
