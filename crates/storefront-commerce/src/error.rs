//! Commerce error types.

use crate::validation::ValidationErrors;
use thiserror::Error;

/// Errors that can occur in e-commerce operations.
///
/// Business-rule violations on the cart (bad quantities, unknown ids) are
/// clamped or ignored rather than reported; what remains here are lookup,
/// stock and infrastructure failures.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Not enough stock to satisfy a request.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },

    /// A raw product record could not be turned into a product.
    #[error("Invalid product record: {0}")]
    InvalidProduct(String),

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Another writer kept changing the stored state.
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    /// Cache error.
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<storefront_cache::CacheError> for CommerceError {
    fn from(e: storefront_cache::CacheError) -> Self {
        match e {
            storefront_cache::CacheError::ConcurrentModification(msg) => {
                CommerceError::ConcurrentModification(msg)
            }
            storefront_cache::CacheError::SerializeError(e) => {
                CommerceError::SerializationError(e.to_string())
            }
            other => CommerceError::CacheError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
