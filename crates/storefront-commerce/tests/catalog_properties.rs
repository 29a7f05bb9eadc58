//! Property-based tests for the catalog query engine.
//!
//! For any catalog and filter:
//! 1. Determinism: the same inputs give the same page
//! 2. Conjunction: every returned product satisfies every active filter
//! 3. Coverage: walking all pages reproduces the filtered, sorted set exactly
//! 4. Ordering: price sorts are monotone

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use storefront_commerce::catalog::Product;
use storefront_commerce::search::{filter, query, FilterSpec, SortOption};
use storefront_commerce::Money;

// =============================================================================
// Strategy helpers
// =============================================================================

const CATEGORIES: &[&str] = &["laptops", "monitors", "storage", ""];
const WORDS: &[&str] = &["gaming", "office", "wireless", "pro", "mini"];

fn product_strategy() -> impl Strategy<Value = Product> {
    (
        0..5_000i64,
        0..20u32,
        prop::sample::select(CATEGORIES),
        prop::sample::select(WORDS),
        0..60i64,
    )
        .prop_map(|(cents, stock, category, word, day)| {
            Product::new("tmp", format!("{} item", word), Money::new(cents))
                .with_stock(stock)
                .with_category(category)
                .with_created_at(Utc.timestamp_opt(1_700_000_000 + day * 86_400, 0).unwrap())
        })
}

fn catalog_strategy() -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec(product_strategy(), 0..60).prop_map(|mut products| {
        for (i, p) in products.iter_mut().enumerate() {
            p.id = format!("p{}", i).into();
        }
        products
    })
}

fn sort_strategy() -> impl Strategy<Value = SortOption> {
    prop_oneof![
        Just(SortOption::Newest),
        Just(SortOption::PriceAsc),
        Just(SortOption::PriceDesc),
        Just(SortOption::parse("bestselling")),
    ]
}

fn spec_strategy() -> impl Strategy<Value = FilterSpec> {
    (
        prop::option::of(prop::sample::select(WORDS)),
        prop::option::of(prop::sample::select(CATEGORIES)),
        prop::option::of(0..3_000i64),
        prop::option::of(1_000..5_000i64),
        any::<bool>(),
        sort_strategy(),
        1..6usize,
        1..15usize,
    )
        .prop_map(|(search, category, min, max, in_stock, sort, page, limit)| {
            let mut spec = FilterSpec::new()
                .with_search(search.unwrap_or(""))
                .with_category(category.unwrap_or(""))
                .with_price_range(min.map(Money::new), max.map(Money::new))
                .with_sort(sort)
                .with_pagination(page, limit);
            spec.in_stock = in_stock;
            spec
        })
}

fn ids(products: &[Product]) -> Vec<String> {
    products.iter().map(|p| p.id.to_string()).collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_query_is_deterministic(catalog in catalog_strategy(), spec in spec_strategy()) {
        let a = query(&catalog, &spec);
        let b = query(&catalog, &spec);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_every_item_satisfies_every_filter(catalog in catalog_strategy(), spec in spec_strategy()) {
        let result = query(&catalog, &spec);
        let needle = spec.search_needle();
        for p in &result.items {
            if let Some(n) = &needle {
                prop_assert!(p.matches_search(n));
            }
            if !spec.category.is_empty() {
                prop_assert_eq!(&p.category, &spec.category);
            }
            if let Some(min) = spec.min_price {
                prop_assert!(p.price >= min);
            }
            if let Some(max) = spec.max_price {
                prop_assert!(p.price <= max);
            }
            if spec.in_stock {
                prop_assert!(p.stock > 0);
            }
        }
    }

    #[test]
    fn prop_pages_cover_result_exactly(catalog in catalog_strategy(), spec in spec_strategy()) {
        let first = query(&catalog, &spec.at_page(1));
        let mut walked = Vec::new();
        for page in 1..=first.total_pages {
            let result = query(&catalog, &spec.at_page(page));
            prop_assert_eq!(result.page, page);
            walked.extend(result.items);
        }

        let mut expected: Vec<Product> = filter(&catalog, &spec).into_iter().cloned().collect();
        if let Some(cmp) = spec.sort_by.comparator() {
            expected.sort_by(|a, b| cmp(a, b));
        }
        prop_assert_eq!(walked.len(), first.total_items);
        prop_assert_eq!(ids(&walked), ids(&expected));
    }

    #[test]
    fn prop_price_asc_is_monotone(catalog in catalog_strategy(), spec in spec_strategy()) {
        let spec = spec.with_sort(SortOption::PriceAsc);
        let result = query(&catalog, &spec);
        for pair in result.items.windows(2) {
            prop_assert!(pair[0].price <= pair[1].price);
        }
    }

    #[test]
    fn prop_page_is_always_in_range(catalog in catalog_strategy(), spec in spec_strategy()) {
        let result = query(&catalog, &spec);
        prop_assert!(result.page >= 1);
        prop_assert!(result.page <= result.total_pages.max(1));
        prop_assert!(result.items.len() <= result.limit);
    }
}
