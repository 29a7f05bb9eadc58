//! The catalog query engine.
//!
//! `query` is a pure function: filter, then stable sort, then paginate.
//! Filters run in a fixed order (search, category, price, stock) and all of
//! them must hold for a product to survive.

use crate::catalog::Product;
use crate::search::{FilterSpec, Pagination, QueryResult};

/// Run `spec` against `products`.
pub fn query(products: &[Product], spec: &FilterSpec) -> QueryResult<Product> {
    let mut matched = filter(products, spec);

    if let Some(compare) = spec.sort_by.comparator() {
        // slice::sort_by is stable, ties keep input order
        matched.sort_by(|a, b| compare(a, b));
    }

    let pagination = Pagination::new(spec.page, spec.effective_limit(), matched.len());
    let items = matched
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.limit)
        .cloned()
        .collect();

    QueryResult::new(items, pagination)
}

/// Products that satisfy every active predicate of `spec`, in input order.
pub fn filter<'a>(products: &'a [Product], spec: &FilterSpec) -> Vec<&'a Product> {
    let needle = spec.search_needle();
    products
        .iter()
        .filter(|p| needle.as_deref().map_or(true, |n| p.matches_search(n)))
        .filter(|p| spec.category.is_empty() || p.category == spec.category)
        .filter(|p| spec.min_price.map_or(true, |min| p.price >= min))
        .filter(|p| spec.max_price.map_or(true, |max| p.price <= max))
        .filter(|p| !spec.in_stock || p.is_in_stock())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::search::SortOption;
    use chrono::{TimeZone, Utc};

    fn product(id: &str, cents: i64, stock: u32, category: &str, day: u32) -> Product {
        Product::new(id, format!("Product {}", id), Money::new(cents))
            .with_stock(stock)
            .with_category(category)
            .with_created_at(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap())
    }

    fn ids(result: &QueryResult<Product>) -> Vec<&str> {
        result.items.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_in_stock_newest() {
        let products = vec![
            product("1", 1000, 5, "a", 1),
            product("2", 500, 0, "b", 31),
        ];
        let spec = FilterSpec::new().in_stock_only();
        let result = query(&products, &spec);
        assert_eq!(ids(&result), vec!["1"]);
        assert_eq!(result.total_items, 1);
        assert_eq!(result.total_pages, 1);
    }

    #[test]
    fn test_empty_catalog() {
        let result = query(&[], &FilterSpec::new().with_pagination(4, 12));
        assert!(result.is_empty());
        assert_eq!(result.total_pages, 0);
        assert_eq!(result.page, 1);
    }

    #[test]
    fn test_search_matches_category_and_ignores_blank() {
        let products = vec![
            product("1", 100, 1, "Monitors", 1).with_description("144Hz panel"),
            product("2", 100, 1, "laptops", 2),
        ];
        let result = query(&products, &FilterSpec::new().with_search("  MONITOR "));
        assert_eq!(ids(&result), vec!["1"]);

        let result = query(&products, &FilterSpec::new().with_search("   "));
        assert_eq!(result.total_items, 2);
    }

    #[test]
    fn test_category_is_exact() {
        let products = vec![product("1", 100, 1, "laptops", 1), product("2", 100, 1, "laptop", 2)];
        let result = query(&products, &FilterSpec::new().with_category("laptop"));
        assert_eq!(ids(&result), vec!["2"]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let products = vec![
            product("1", 999, 1, "a", 1),
            product("2", 1000, 1, "a", 2),
            product("3", 2000, 1, "a", 3),
            product("4", 2001, 1, "a", 4),
        ];
        let spec = FilterSpec::new()
            .with_price_range(Some(Money::new(1000)), Some(Money::new(2000)))
            .with_sort(SortOption::PriceAsc);
        assert_eq!(ids(&query(&products, &spec)), vec!["2", "3"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let products = vec![
            product("a", 500, 1, "x", 1),
            product("b", 100, 1, "x", 1),
            product("c", 500, 1, "x", 1),
            product("d", 100, 1, "x", 1),
        ];
        let asc = query(&products, &FilterSpec::new().with_sort(SortOption::PriceAsc));
        assert_eq!(ids(&asc), vec!["b", "d", "a", "c"]);

        let desc = query(&products, &FilterSpec::new().with_sort(SortOption::PriceDesc));
        assert_eq!(ids(&desc), vec!["a", "c", "b", "d"]);

        // all share a creation date
        let newest = query(&products, &FilterSpec::new());
        assert_eq!(ids(&newest), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_unknown_sort_keeps_input_order() {
        let products = vec![product("1", 300, 1, "x", 1), product("2", 100, 1, "x", 9)];
        let spec = FilterSpec::new().with_sort(SortOption::parse("rating"));
        assert_eq!(ids(&query(&products, &spec)), vec!["1", "2"]);
    }

    #[test]
    fn test_page_is_clamped() {
        let products: Vec<_> = (1..=25).map(|i| product(&i.to_string(), 100, 1, "x", 1)).collect();
        let result = query(&products, &FilterSpec::new().with_pagination(9, 10));
        assert_eq!(result.page, 3);
        assert_eq!(result.total_pages, 3);
        assert_eq!(ids(&result), vec!["21", "22", "23", "24", "25"]);
    }

    #[test]
    fn test_zero_limit_uses_default() {
        let products: Vec<_> = (1..=20).map(|i| product(&i.to_string(), 100, 1, "x", 1)).collect();
        let mut spec = FilterSpec::new();
        spec.limit = 0;
        let result = query(&products, &spec);
        assert_eq!(result.len(), 12);
        assert_eq!(result.limit, 12);
    }
}
