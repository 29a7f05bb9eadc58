//! Bearer tokens.
//!
//! Tokens are opaque random strings. The server keeps one record per token,
//! which is what makes logout and user deletion revoke them.

use crate::AuthError;
use serde::{Deserialize, Serialize};
use storefront_commerce::UserId;

/// Default token lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// An issued bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    /// The token value.
    pub token: String,
    /// User ID this token belongs to.
    pub user_id: UserId,
    /// Unix timestamp when token was created.
    pub created_at: i64,
    /// Unix timestamp when token expires.
    pub expires_at: i64,
}

impl AuthToken {
    /// Issue a token with the default lifetime.
    pub fn generate(user_id: UserId) -> Self {
        Self::generate_with_expiry(user_id, DEFAULT_TOKEN_TTL_SECS)
    }

    /// Issue a token valid for `expiry_secs`.
    pub fn generate_with_expiry(user_id: UserId, expiry_secs: i64) -> Self {
        let now = current_timestamp();
        Self {
            token: generate_token_string(),
            user_id,
            created_at: now,
            expires_at: now + expiry_secs,
        }
    }

    /// Check if token is expired.
    pub fn is_expired(&self) -> bool {
        current_timestamp() > self.expires_at
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        if self.is_expired() {
            return Err(AuthError::TokenExpired);
        }
        Ok(())
    }

    /// Get time until expiration in seconds.
    pub fn time_to_expiry(&self) -> i64 {
        (self.expires_at - current_timestamp()).max(0)
    }

    /// Expiry as Unix milliseconds, the unit clients store.
    pub fn expires_at_millis(&self) -> i64 {
        self.expires_at.saturating_mul(1000)
    }
}

/// Generate a cryptographically secure token string.
fn generate_token_string() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use rand::Rng;

    let bytes: [u8; 24] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
