//! Search module.
//!
//! Contains the catalog query engine, its filter specification, result
//! pagination and the recent-search history.

mod engine;
mod filter;
mod history;
mod query;
mod results;

pub use engine::{filter, query};
pub use filter::{FilterParams, FilterSpec, DEFAULT_PAGE_SIZE, PAGE_SIZES};
pub use history::{RecentSearches, MAX_RECENT_SEARCHES, RECENT_SEARCHES_KEY};
pub use query::SortOption;
pub use results::{Pagination, QueryResult, MAX_PAGES_TO_SHOW};
