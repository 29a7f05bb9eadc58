//! HTTP collaborators for the storefront.
//!
//! A small JSON client with per-request timeouts and retry with backoff, and
//! the services built on it: the product source behind the catalog (with a
//! demo fallback), the category list and the auth API.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_data::{CatalogLoader, FetchClient, FetchPolicy, HttpProductSource};
//!
//! let client = FetchClient::new("http://localhost:5000/api", FetchPolicy::default())?;
//! let loader = CatalogLoader::new(HttpProductSource::new(client));
//!
//! let load = loader.load(&spec).await;
//! if let Some(notice) = load.notice() {
//!     eprintln!("{notice}");
//! }
//! ```

mod auth;
mod categories;
mod client;
mod error;
mod products;
mod retry;
mod timeout;

pub use auth::AuthClient;
pub use categories::{parse_categories, CategorySource, CATEGORY_TIMEOUT};
pub use client::{FetchClient, FetchPolicy};
pub use error::FetchError;
pub use products::{
    CatalogLoad, CatalogLoader, CatalogOrigin, HttpProductSource, ProductSource, FETCH_ALL_LIMIT,
    MAX_FETCH_PAGES,
};
pub use retry::{
    retry_with_backoff, BackoffStrategy, RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY,
};
pub use timeout::{TimeoutConfig, DEFAULT_TIMEOUT};
