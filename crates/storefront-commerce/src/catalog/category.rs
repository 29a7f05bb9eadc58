//! Category types for product organization.
//!
//! Products carry a plain category tag; this module provides the display
//! list used by category pickers and per-category product counts.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A category as shown to shoppers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u32,
    /// Tag stored on products (e.g. "laptops").
    pub name: String,
    /// Human readable label.
    #[serde(default)]
    pub display_name: String,
}

impl Category {
    pub fn new(id: u32, name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            display_name: display_name.into(),
        }
    }

    /// The display name, or the tag when no display name is set.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// Categories used when no category source answers.
pub fn default_categories() -> Vec<Category> {
    [
        ("laptops", "Laptops & Notebooks"),
        ("peripherals", "Peripherals"),
        ("monitors", "Monitors"),
        ("components", "PC Components"),
        ("storage", "Storage"),
        ("networking", "Networking"),
        ("software", "Software"),
        ("accessories", "Accessories"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, display), id)| Category::new(id, name, display))
    .collect()
}

/// Number of products tagged with one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Products per category, sorted by category. Uncategorized products are
/// not counted.
pub fn category_counts(products: &[Product]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for product in products.iter().filter(|p| !p.category.is_empty()) {
        *counts.entry(product.category.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_default_categories() {
        let categories = default_categories();
        assert_eq!(categories.len(), 8);
        assert_eq!(categories[0].id, 1);
        assert_eq!(categories[0].name, "laptops");
        assert_eq!(categories[7].label(), "Accessories");
    }

    #[test]
    fn test_label_falls_back_to_name() {
        let category: Category = serde_json::from_str(r#"{"id": 3, "name": "audio"}"#).unwrap();
        assert_eq!(category.label(), "audio");
    }

    #[test]
    fn test_category_counts() {
        let products = vec![
            Product::new("1", "A", Money::zero()).with_category("b"),
            Product::new("2", "B", Money::zero()).with_category("a"),
            Product::new("3", "C", Money::zero()).with_category("b"),
            Product::new("4", "D", Money::zero()),
        ];
        let counts = category_counts(&products);
        assert_eq!(
            counts,
            vec![
                CategoryCount { category: "a".into(), count: 1 },
                CategoryCount { category: "b".into(), count: 2 },
            ]
        );
    }
}
