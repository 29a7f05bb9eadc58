//! The canonical product type.

use crate::ids::ProductId;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// A product in the catalog.
///
/// This is the only product shape the query engine and the cart see. Raw
/// records from other sources go through [`crate::catalog::normalize`] first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Unit price, never negative.
    pub price: Money,
    /// Category tag, empty when uncategorized.
    #[serde(default)]
    pub category: String,
    /// Units available.
    #[serde(default)]
    pub stock: u32,
    /// Average rating in `0.0..=5.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Flagged as a new arrival.
    #[serde(default)]
    pub is_new: bool,
    /// Creation time, drives the "newest" ordering.
    pub created_at: DateTime<Utc>,
    /// Image URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl Product {
    /// Create a product with the required fields; everything else is empty.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            category: String::new(),
            stock: 0,
            rating: None,
            is_new: false,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            image: None,
            brand: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(clamp_rating(rating));
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn mark_new(mut self) -> Self {
        self.is_new = true;
        self
    }

    /// Check if at least one unit is available.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether `needle` (already lower-cased) occurs in the name, description
    /// or category, ignoring case.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }
}

/// Bound a rating to `0.0..=5.0`. NaN becomes `0.0`.
pub fn clamp_rating(rating: f64) -> f64 {
    if rating.is_nan() {
        0.0
    } else {
        rating.clamp(0.0, MAX_RATING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_product_creation() {
        let product = Product::new("p-1", "Desk Lamp", Money::new(2500))
            .with_category("lighting")
            .with_stock(3);
        assert_eq!(product.id.as_str(), "p-1");
        assert!(product.is_in_stock());
        assert!(!product.is_new);
    }

    #[test]
    fn test_rating_is_clamped() {
        let product = Product::new("p", "P", Money::zero()).with_rating(7.5);
        assert_eq!(product.rating, Some(5.0));
        assert_eq!(clamp_rating(-1.0), 0.0);
        assert_eq!(clamp_rating(f64::NAN), 0.0);
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        let product = Product::new("p", "Mechanical Keyboard", Money::new(8000))
            .with_description("Blue switches")
            .with_category("Peripherals");
        assert!(product.matches_search("keyboard"));
        assert!(product.matches_search("blue"));
        assert!(product.matches_search("peripher"));
        assert!(!product.matches_search("mouse"));
    }

    #[test]
    fn test_camel_case_wire_format() {
        let product = Product::new("p-9", "Router", Money::new(4550))
            .with_created_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .mark_new();
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["isNew"], true);
        assert_eq!(json["price"], 45.5);
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00Z");
        assert!(json.get("rating").is_none());

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, product);
    }
}
