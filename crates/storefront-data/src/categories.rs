//! Category list from the remote API, with the built-in list as fallback.

use crate::client::{unwrap_data, FetchClient, FetchPolicy};
use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;
use crate::FetchError;
use serde_json::Value;
use std::time::Duration;
use storefront_commerce::catalog::{default_categories, Category};
use tracing::{info, warn};

/// Categories are decoration; they get a short timeout and a single try.
pub const CATEGORY_TIMEOUT: Duration = Duration::from_secs(3);

pub struct CategorySource {
    client: FetchClient,
}

impl CategorySource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let policy = FetchPolicy::new(TimeoutConfig::from_total(CATEGORY_TIMEOUT), RetryPolicy::none());
        Ok(Self {
            client: FetchClient::new(base_url, policy)?,
        })
    }

    /// `GET {base}/categories`, failing on any error.
    pub async fn fetch(&self) -> Result<Vec<Category>, FetchError> {
        let payload: Value = self.client.get_json("/categories", &[], None).await?;
        Ok(parse_categories(&unwrap_data(payload)))
    }

    /// The remote list, or [`default_categories`] if it fails or is empty.
    pub async fn load(&self) -> Vec<Category> {
        match self.fetch().await {
            Ok(categories) if !categories.is_empty() => categories,
            Ok(_) => {
                info!("category source returned nothing, using defaults");
                default_categories()
            }
            Err(e) => {
                warn!(error = %e, "category source unavailable, using defaults");
                default_categories()
            }
        }
    }
}

/// Accepts category objects (`{id, name, displayName}`) or bare names.
/// Entries without a name are skipped.
pub fn parse_categories(value: &Value) -> Vec<Category> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .zip(1u32..)
        .filter_map(|(item, position)| match item {
            Value::String(name) if !name.trim().is_empty() => {
                Some(Category::new(position, name.trim(), ""))
            }
            Value::Object(obj) => {
                let name = obj.get("name").and_then(Value::as_str)?.trim();
                if name.is_empty() {
                    return None;
                }
                let id = obj
                    .get("id")
                    .and_then(|v| v.as_u64().or_else(|| v.as_str()?.parse().ok()))
                    .and_then(|id| u32::try_from(id).ok())
                    .unwrap_or(position);
                let display = obj
                    .get("displayName")
                    .or_else(|| obj.get("display_name"))
                    .and_then(Value::as_str)
                    .unwrap_or("");
                Some(Category::new(id, name, display))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_mixed_shapes() {
        let parsed = parse_categories(&json!([
            {"id": 7, "name": "laptops", "displayName": "Laptops"},
            {"id": "9", "name": "audio"},
            "cables",
            {"displayName": "nameless"},
            42
        ]));
        assert_eq!(
            parsed,
            vec![
                Category::new(7, "laptops", "Laptops"),
                Category::new(9, "audio", ""),
                Category::new(3, "cables", ""),
            ]
        );
    }

    #[test]
    fn test_parse_non_list() {
        assert!(parse_categories(&json!({"oops": true})).is_empty());
    }
}
