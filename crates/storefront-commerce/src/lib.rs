//! E-commerce domain types and logic for the storefront.
//!
//! - **Catalog**: products, ingestion from loosely shaped sources, categories,
//!   admin drafts, a demo dataset
//! - **Search**: the catalog query engine (filter, stable sort, paginate) and
//!   recent-search history
//! - **Cart**: the cart aggregate and its persisted, versioned form
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_commerce::prelude::*;
//! use storefront_cache::MemoryStore;
//!
//! let products = demo_products();
//! let page = query(&products, &FilterSpec::new().in_stock_only().with_sort(SortOption::PriceAsc));
//!
//! let mut cart = PersistentCart::load(MemoryStore::new())?;
//! cart.add_item(&page.items[0], 2)?;
//! println!("Total: {}", cart.total());
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod validation;

pub mod cart;
pub mod catalog;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;
pub use validation::ValidationErrors;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;
    pub use crate::validation::ValidationErrors;

    // Catalog
    pub use crate::catalog::{
        category_counts, default_categories, demo_products, normalize_payload, Category,
        CategoryCount, Product, ProductDraft,
    };

    // Cart
    pub use crate::cart::{
        ensure_available, Cart, CartEntry, PersistentCart, ReconcileReport, MAX_QUANTITY,
    };

    // Search
    pub use crate::search::{
        query, FilterParams, FilterSpec, Pagination, QueryResult, RecentSearches, SortOption,
    };
}
