//! Sort options for catalog queries.

use crate::catalog::Product;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// How a result set is ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SortOption {
    /// Most recently created first.
    #[default]
    Newest,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// A sort key this engine doesn't know; input order is kept.
    Unsorted(String),
}

impl SortOption {
    /// Parse a `sortBy` value. Unknown values are carried, not rejected.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "newest" => SortOption::Newest,
            "price_asc" => SortOption::PriceAsc,
            "price_desc" => SortOption::PriceDesc,
            other => SortOption::Unsorted(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SortOption::Newest => "newest",
            SortOption::PriceAsc => "price_asc",
            SortOption::PriceDesc => "price_desc",
            SortOption::Unsorted(raw) => raw,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            SortOption::Newest => "Newest",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::Unsorted(_) => "Unsorted",
        }
    }

    /// Comparator for a stable sort, `None` when order must be preserved.
    pub fn comparator(&self) -> Option<fn(&Product, &Product) -> Ordering> {
        match self {
            SortOption::Newest => Some(newest_first),
            SortOption::PriceAsc => Some(cheapest_first),
            SortOption::PriceDesc => Some(priciest_first),
            SortOption::Unsorted(_) => None,
        }
    }
}

fn newest_first(a: &Product, b: &Product) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

fn cheapest_first(a: &Product, b: &Product) -> Ordering {
    a.price.cmp(&b.price)
}

fn priciest_first(a: &Product, b: &Product) -> Ordering {
    b.price.cmp(&a.price)
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SortOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SortOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(SortOption::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!(SortOption::parse("price_asc"), SortOption::PriceAsc);
        assert_eq!(SortOption::parse(" newest "), SortOption::Newest);
        assert_eq!(SortOption::parse("popular").as_str(), "popular");
        assert!(SortOption::parse("popular").comparator().is_none());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&SortOption::PriceDesc).unwrap(), "\"price_desc\"");
        let sort: SortOption = serde_json::from_str("\"newest\"").unwrap();
        assert_eq!(sort, SortOption::Newest);
    }
}
