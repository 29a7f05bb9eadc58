//! Key-Value persistence layer for the storefront.
//!
//! Provides a small [`KvStore`] trait with in-memory and directory-backed
//! implementations, plus typed helpers built on top of it: a JSON [`Cache`],
//! version-stamped records with optimistic concurrency, and named document
//! [`Collection`]s.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_cache::{Cache, MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//!
//! // Store a value
//! cache.set("recentSearches", &vec!["lamp"])?;
//!
//! // Retrieve a value
//! let terms: Option<Vec<String>> = cache.get("recentSearches")?;
//!
//! // Delete a value
//! cache.delete("recentSearches")?;
//! ```

mod collection;
mod error;
mod kv;
mod store;
mod versioned;

pub use collection::Collection;
pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, KvStore, MemoryStore};
pub use versioned::{Versioned, VersionedStore, MAX_UPDATE_ATTEMPTS};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, Collection, FileStore, KvStore, MemoryStore};
}
