//! Admin create/update payload for products.

use crate::catalog::product::MAX_RATING;
use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;
use crate::validation::ValidationErrors;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_DESCRIPTION_LEN: usize = 10;
pub const MAX_PRICE: f64 = 999_999.99;
pub const MAX_STOCK: i64 = 99_999;

/// Product fields as submitted by an administrator.
///
/// Everything is optional on the wire so that missing fields turn into
/// validation messages instead of deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub category: String,
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<f64>,
    pub is_new: bool,
}

impl ProductDraft {
    /// Check every field and report all problems at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "name is required");
        } else if name.chars().count() < MIN_NAME_LEN {
            errors.add("name", format!("name must be at least {} characters", MIN_NAME_LEN));
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.add("description", "description is required");
        } else if description.chars().count() < MIN_DESCRIPTION_LEN {
            errors.add(
                "description",
                format!("description must be at least {} characters", MIN_DESCRIPTION_LEN),
            );
        }

        match self.price {
            None => errors.add("price", "price is required"),
            Some(p) if !p.is_finite() => errors.add("price", "price must be a number"),
            Some(p) if p < 0.0 => errors.add("price", "price cannot be negative"),
            Some(p) if p > MAX_PRICE => errors.add("price", "price cannot exceed 999999.99"),
            Some(p) if ((p * 100.0).round() - p * 100.0).abs() > 1e-6 => {
                errors.add("price", "price can have at most two decimals")
            }
            Some(_) => {}
        }

        if self.category.trim().is_empty() {
            errors.add("category", "category is required");
        }

        match self.stock {
            None => errors.add("stock", "stock is required"),
            Some(s) if s < 0 => errors.add("stock", "stock cannot be negative"),
            Some(s) if s > MAX_STOCK => errors.add("stock", "stock cannot exceed 99999 units"),
            Some(_) => {}
        }

        if let Some(image) = self.image.as_deref().filter(|s| !s.trim().is_empty()) {
            if !looks_like_url(image.trim()) {
                errors.add("image", "image must be an http(s) URL");
            }
        }

        if let Some(rating) = self.rating {
            if !(0.0..=MAX_RATING).contains(&rating) {
                errors.add("rating", "rating must be between 0 and 5");
            }
        }

        errors.into_result()
    }

    /// Build a new product. `now` becomes its creation time.
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Result<Product, ValidationErrors> {
        let mut product = Product::new(id, "", Money::zero()).with_created_at(now);
        self.apply_to(&mut product)?;
        Ok(product)
    }

    /// Overwrite the editable fields of `product`. Id and creation time stay.
    pub fn apply_to(&self, product: &mut Product) -> Result<(), ValidationErrors> {
        self.validate()?;
        product.name = self.name.trim().to_string();
        product.description = self.description.trim().to_string();
        product.price = Money::from_decimal(self.price.unwrap_or_default());
        product.category = self.category.trim().to_string();
        product.stock = self.stock.unwrap_or_default().clamp(0, MAX_STOCK) as u32;
        product.image = non_empty(self.image.as_deref());
        product.brand = non_empty(self.brand.as_deref());
        product.rating = self.rating;
        product.is_new = self.is_new;
        Ok(())
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: Some(product.price.to_decimal()),
            category: product.category.clone(),
            stock: Some(i64::from(product.stock)),
            image: product.image.clone(),
            brand: product.brand.clone(),
            rating: product.rating,
            is_new: product.is_new,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn looks_like_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split('/').next().unwrap_or_default();
            host.contains('.') && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
