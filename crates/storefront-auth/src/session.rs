//! Client-side session persistence.
//!
//! A signed-in client keeps three entries in its local store: the user
//! profile under `user`, the bearer token under `token` and the token's
//! expiry (Unix milliseconds) under `tokenExpiry`.

use crate::token::DEFAULT_TOKEN_TTL_SECS;
use crate::user::{Permission, User};
use crate::AuthError;
use serde::{Deserialize, Serialize};
use storefront_cache::{Cache, KvStore};
use tracing::{debug, info};

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";
pub const TOKEN_EXPIRY_KEY: &str = "tokenExpiry";

/// What the auth endpoints return on register and login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    /// Unix milliseconds. Servers that do not send it get the default
    /// lifetime counted from receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_expiry: Option<i64>,
}

/// The persisted session of a client.
pub struct ClientSession<S> {
    cache: Cache<S>,
    user: Option<User>,
    token: Option<String>,
    token_expiry: Option<i64>,
}

impl<S: KvStore> ClientSession<S> {
    /// Restore the session from `store`.
    ///
    /// A partial or unreadable session is wiped, and so is one whose token
    /// has expired.
    pub fn load(store: S) -> Result<Self, AuthError> {
        let cache = Cache::new(store);
        let user = cache.get_or_discard::<User>(USER_KEY)?;
        let token = cache.get_or_discard::<String>(TOKEN_KEY)?;
        let token_expiry = cache.get_or_discard::<i64>(TOKEN_EXPIRY_KEY)?;

        let mut session = Self {
            cache,
            user,
            token,
            token_expiry,
        };

        match (&session.user, &session.token) {
            (Some(_), Some(_)) if session.is_expired() => {
                info!("stored session has expired");
                session.clear()?;
            }
            (Some(user), Some(_)) => debug!(user_id = %user.id, "session restored"),
            (None, None) => {}
            _ => {
                debug!("discarding incomplete session");
                session.clear()?;
            }
        }
        Ok(session)
    }

    /// Persist a fresh sign-in.
    pub fn store(&mut self, response: &AuthResponse) -> Result<(), AuthError> {
        let expiry = response
            .token_expiry
            .unwrap_or_else(|| now_millis() + DEFAULT_TOKEN_TTL_SECS * 1000);

        self.cache.set(USER_KEY, &response.user)?;
        self.cache.set(TOKEN_KEY, &response.token)?;
        self.cache.set(TOKEN_EXPIRY_KEY, &expiry)?;

        self.user = Some(response.user.clone());
        self.token = Some(response.token.clone());
        self.token_expiry = Some(expiry);
        Ok(())
    }

    /// Replace the cached profile, e.g. after the user edits it.
    pub fn update_user(&mut self, user: User) -> Result<(), AuthError> {
        self.cache.set(USER_KEY, &user)?;
        self.user = Some(user);
        Ok(())
    }

    /// Sign out locally.
    pub fn clear(&mut self) -> Result<(), AuthError> {
        for key in [USER_KEY, TOKEN_KEY, TOKEN_EXPIRY_KEY] {
            self.cache.delete(key)?;
        }
        self.user = None;
        self.token = None;
        self.token_expiry = None;
        Ok(())
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref().filter(|_| self.is_authenticated())
    }

    /// The bearer token, while it is still valid.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|_| self.is_authenticated())
    }

    pub fn token_expiry(&self) -> Option<i64> {
        self.token_expiry
    }

    /// No expiry recorded means the token does not expire client-side.
    pub fn is_expired(&self) -> bool {
        self.token_expiry.is_some_and(|expiry| now_millis() > expiry)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some() && !self.is_expired()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.user().is_some_and(|u| u.has_permission(permission))
    }

    /// Permissions of the signed-in user, empty when signed out.
    pub fn permissions(&self) -> &'static [Permission] {
        match self.user() {
            Some(user) => user.role.permissions(),
            None => &[],
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::Role;
    use storefront_cache::MemoryStore;
    use storefront_commerce::UserId;

    fn response(role: Role, expiry: Option<i64>) -> AuthResponse {
        AuthResponse {
            user: User::new(UserId::new("u1"), "Ada", "ada@example.com", role),
            token: "tok".to_string(),
            token_expiry: expiry,
        }
    }

    #[test]
    fn test_store_and_restore() {
        let store = MemoryStore::new();
        let mut session = ClientSession::load(store.clone()).unwrap();
        assert!(!session.is_authenticated());
        assert!(session.permissions().is_empty());

        session.store(&response(Role::Customer, None)).unwrap();
        assert!(session.is_authenticated());

        let restored = ClientSession::load(store).unwrap();
        assert!(restored.is_authenticated());
        assert_eq!(restored.token(), Some("tok"));
        assert_eq!(restored.user().map(|u| u.name.as_str()), Some("Ada"));
        assert!(restored.token_expiry().unwrap() > now_millis());
        assert!(restored.has_permission(Permission::Purchase));
        assert!(!restored.is_admin());
    }

    #[test]
    fn test_expired_session_is_wiped_on_load() {
        let store = MemoryStore::new();
        let mut session = ClientSession::load(store.clone()).unwrap();
        session
            .store(&response(Role::Customer, Some(now_millis() - 1_000)))
            .unwrap();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());

        let restored = ClientSession::load(store.clone()).unwrap();
        assert!(!restored.is_authenticated());
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_user_discards_session() {
        let store = MemoryStore::new();
        store.set(USER_KEY, b"{not json").unwrap();
        store.set(TOKEN_KEY, b"\"tok\"").unwrap();

        let session = ClientSession::load(store.clone()).unwrap();
        assert!(!session.is_authenticated());
        assert!(store.is_empty());
    }

    #[test]
    fn test_admin_permissions_and_clear() {
        let mut session = ClientSession::load(MemoryStore::new()).unwrap();
        session.store(&response(Role::Admin, None)).unwrap();
        assert!(session.is_admin());
        assert!(session.has_permission(Permission::ManageUsers));
        assert!(session.has_permission(Permission::Purchase));

        session.clear().unwrap();
        assert!(!session.is_admin());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_update_user_keeps_token() {
        let store = MemoryStore::new();
        let mut session = ClientSession::load(store.clone()).unwrap();
        session.store(&response(Role::Customer, None)).unwrap();

        let mut user = session.user().cloned().unwrap();
        user.name = "Countess".to_string();
        session.update_user(user).unwrap();

        let restored = ClientSession::load(store).unwrap();
        assert_eq!(restored.user().unwrap().name, "Countess");
        assert_eq!(restored.token(), Some("tok"));
    }

    #[test]
    fn test_response_wire_format() {
        let json = serde_json::json!({
            "user": {"_id": "u9", "name": "Bo", "email": "bo@example.com", "role": "admin"},
            "token": "abc"
        });
        let parsed: AuthResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.user.id, UserId::new("u9"));
        assert!(parsed.user.is_admin());
        assert_eq!(parsed.token_expiry, None);
    }
}
