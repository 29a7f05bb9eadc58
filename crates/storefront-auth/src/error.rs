//! Authentication errors.

use storefront_commerce::ValidationErrors;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email or wrong password. The two are not told apart.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Email already registered.
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),

    /// Token unknown, revoked or pointing at a deleted user.
    #[error("token invalid or expired")]
    InvalidToken,

    /// Token expired.
    #[error("token expired")]
    TokenExpired,

    /// Insufficient permissions.
    #[error("insufficient permissions")]
    InsufficientPermissions,

    /// Form input rejected.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] storefront_cache::CacheError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::TokenExpired
        )
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(self, AuthError::InsufficientPermissions)
    }
}
