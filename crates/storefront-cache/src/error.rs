//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using a store.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Failed to perform store operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Filesystem failure in a file-backed store.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Concurrent modification detected.
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),
}

impl CacheError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Whether the error comes from malformed stored data rather than the store itself.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, CacheError::SerializeError(_))
    }
}
