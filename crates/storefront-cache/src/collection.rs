//! Named collections of JSON documents.
//!
//! Documents live under `"{collection}:{id}"` keys, which is enough of a
//! document store for the storefront backend's products and users.

use crate::{cache_key, Cache, CacheError, KvStore};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Collection<S, T> {
    cache: Cache<S>,
    name: String,
    _doc: PhantomData<fn() -> T>,
}

impl<S, T> Collection<S, T>
where
    S: KvStore,
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: S, name: impl Into<String>) -> Self {
        Self {
            cache: Cache::new(store),
            name: name.into(),
            _doc: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn key(&self, id: &str) -> String {
        cache_key!(self.name.as_str(), id)
    }

    pub fn get(&self, id: &str) -> Result<Option<T>, CacheError> {
        self.cache.get(&self.key(id))
    }

    /// Insert or overwrite the document with this id.
    pub fn put(&self, id: &str, doc: &T) -> Result<(), CacheError> {
        self.cache.set(&self.key(id), doc)
    }

    /// Insert only if no document has this id yet. Returns `false` if it did.
    pub fn insert_new(&self, id: &str, doc: &T) -> Result<bool, CacheError> {
        let bytes = serde_json::to_vec(doc)?;
        self.cache
            .store()
            .compare_and_swap(&self.key(id), None, &bytes)
    }

    /// Delete a document. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, CacheError> {
        let key = self.key(id);
        if !self.cache.exists(&key)? {
            return Ok(false);
        }
        self.cache.delete(&key)?;
        Ok(true)
    }

    pub fn ids(&self) -> Result<Vec<String>, CacheError> {
        let prefix = format!("{}:", self.name);
        Ok(self
            .cache
            .keys_with_prefix(&prefix)?
            .into_iter()
            .map(|k| k[prefix.len()..].to_string())
            .collect())
    }

    /// Every readable document, in id order. Unreadable documents are skipped.
    pub fn list(&self) -> Result<Vec<T>, CacheError> {
        let mut docs = Vec::new();
        for id in self.ids()? {
            match self.get(&id) {
                Ok(Some(doc)) => docs.push(doc),
                Ok(None) => {}
                Err(e) if e.is_corrupt_data() => {
                    warn!(collection = %self.name, id, error = %e, "skipping malformed document");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(docs)
    }

    pub fn count(&self) -> Result<usize, CacheError> {
        Ok(self.ids()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn test_collections_are_isolated_by_prefix() {
        let store = MemoryStore::new();
        let products: Collection<_, String> = Collection::new(store.clone(), "products");
        let users: Collection<_, String> = Collection::new(store.clone(), "users");

        products.put("1", &"lamp".to_string()).unwrap();
        products.put("2", &"desk".to_string()).unwrap();
        users.put("1", &"ada".to_string()).unwrap();

        assert_eq!(products.list().unwrap(), vec!["lamp", "desk"]);
        assert_eq!(users.count().unwrap(), 1);
        assert_eq!(products.ids().unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn test_insert_new_refuses_existing_id() {
        let docs: Collection<_, u32> = Collection::new(MemoryStore::new(), "n");
        assert!(docs.insert_new("a", &1).unwrap());
        assert!(!docs.insert_new("a", &2).unwrap());
        assert_eq!(docs.get("a").unwrap(), Some(1));
    }

    #[test]
    fn test_delete_reports_existence() {
        let docs: Collection<_, u32> = Collection::new(MemoryStore::new(), "n");
        docs.put("a", &1).unwrap();
        assert!(docs.delete("a").unwrap());
        assert!(!docs.delete("a").unwrap());
    }

    #[test]
    fn test_list_skips_malformed_documents() {
        let store = MemoryStore::new();
        store.set("n:bad", b"{").unwrap();
        let docs: Collection<_, u32> = Collection::new(store, "n");
        docs.put("good", &7).unwrap();
        assert_eq!(docs.list().unwrap(), vec![7]);
    }
}
