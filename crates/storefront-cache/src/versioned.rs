//! Version-stamped records with optimistic concurrency.
//!
//! A [`VersionedStore`] owns one key. Every write bumps the record's version
//! and is a compare-and-swap against the exact bytes that were read, so a
//! concurrent writer is detected instead of silently overwritten.

use crate::{CacheError, KvStore};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Maximum number of read-modify-write attempts before giving up.
pub const MAX_UPDATE_ATTEMPTS: usize = 3;

/// A record that carries its own version stamp.
pub trait Versioned: Serialize + DeserializeOwned + Default {
    fn version(&self) -> u64;
    fn set_version(&mut self, version: u64);
}

/// A single versioned record under a fixed key.
#[derive(Debug, Clone)]
pub struct VersionedStore<S, T> {
    store: S,
    key: String,
    _record: PhantomData<fn() -> T>,
}

impl<S: KvStore, T: Versioned> VersionedStore<S, T> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _record: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the current record.
    ///
    /// A missing key yields `T::default()`. Malformed data is logged and also
    /// yields the default; it will be replaced by the next write.
    pub fn load(&self) -> Result<T, CacheError> {
        let raw = self.store.get(&self.key)?;
        Ok(self.decode(raw.as_deref()))
    }

    /// Apply `mutate` to the latest stored record and write it back.
    ///
    /// On a version conflict the latest record is re-read and `mutate` is
    /// replayed on it, up to [`MAX_UPDATE_ATTEMPTS`] times.
    pub fn update<F>(&self, mut mutate: F) -> Result<T, CacheError>
    where
        F: FnMut(&mut T),
    {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let raw = self.store.get(&self.key)?;
            let mut record = self.decode(raw.as_deref());
            let next_version = record.version() + 1;

            mutate(&mut record);
            record.set_version(next_version);

            let bytes = serde_json::to_vec(&record)?;
            if self
                .store
                .compare_and_swap(&self.key, raw.as_deref(), &bytes)?
            {
                return Ok(record);
            }
            debug!(key = %self.key, attempt, "version conflict, replaying update");
        }

        Err(CacheError::ConcurrentModification(format!(
            "{} changed concurrently {} times in a row",
            self.key, MAX_UPDATE_ATTEMPTS
        )))
    }

    /// Replace the stored record wholesale, keeping the version sequence.
    pub fn replace(&self, value: T) -> Result<T, CacheError>
    where
        T: Clone,
    {
        self.update(|record| *record = value.clone())
    }

    fn decode(&self, raw: Option<&[u8]>) -> T {
        let Some(bytes) = raw else {
            return T::default();
        };
        match serde_json::from_slice(bytes) {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding malformed stored record");
                T::default()
            }
        }
    }
}
