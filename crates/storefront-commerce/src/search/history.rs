//! Recent search terms, persisted between sessions.

use crate::error::CommerceError;
use storefront_cache::{Cache, KvStore};
use tracing::debug;

/// Storage key for the history.
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

/// How many terms are remembered.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Most-recent-first list of distinct search terms.
pub struct RecentSearches<S> {
    cache: Cache<S>,
    entries: Vec<String>,
}

impl<S: KvStore> RecentSearches<S> {
    /// Load the stored history. Unreadable data starts an empty history.
    pub fn load(store: S) -> Result<Self, CommerceError> {
        let cache = Cache::new(store);
        let mut entries: Vec<String> = cache
            .get_or_discard(RECENT_SEARCHES_KEY)?
            .unwrap_or_default();
        entries.truncate(MAX_RECENT_SEARCHES);
        Ok(Self { cache, entries })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Put `term` at the front. Blank terms are ignored; an existing copy
    /// moves to the front instead of repeating.
    pub fn record(&mut self, term: &str) -> Result<(), CommerceError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(());
        }

        self.entries.retain(|t| t != term);
        self.entries.insert(0, term.to_string());
        self.entries.truncate(MAX_RECENT_SEARCHES);
        debug!(term, "recorded search term");
        self.persist()
    }

    pub fn clear(&mut self) -> Result<(), CommerceError> {
        self.entries.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), CommerceError> {
        self.cache.set(RECENT_SEARCHES_KEY, &self.entries)?;
        Ok(())
    }
}
