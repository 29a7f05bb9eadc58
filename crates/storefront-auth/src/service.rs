//! Server-side account management: registration, login, bearer tokens and
//! user administration over a key-value store.

use crate::password::PasswordHasher;
use crate::session::AuthResponse;
use crate::token::{AuthToken, DEFAULT_TOKEN_TTL_SECS};
use crate::user::{Role, User, UserRecord, UserUpdate};
use crate::validate::{self, normalize_email};
use crate::AuthError;
use serde::{Deserialize, Serialize};
use storefront_cache::{Collection, KvStore};
use storefront_commerce::UserId;
use tracing::{debug, info, warn};

/// Collection names inside the store.
const USERS: &str = "users";
const EMAILS: &str = "user_emails";
const TOKENS: &str = "tokens";

/// Display name given to a bootstrapped administrator.
const ADMIN_NAME: &str = "Administrator";

/// Registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Accounts and their tokens.
///
/// Users are stored by id, with a separate email index whose entries are
/// created by compare-and-swap, so two registrations racing for the same
/// address cannot both succeed.
pub struct AuthService<S> {
    users: Collection<S, UserRecord>,
    emails: Collection<S, String>,
    tokens: Collection<S, AuthToken>,
    hasher: PasswordHasher,
    token_ttl_secs: i64,
}

impl<S: KvStore + Clone> AuthService<S> {
    pub fn new(store: S) -> Self {
        Self {
            users: Collection::new(store.clone(), USERS),
            emails: Collection::new(store.clone(), EMAILS),
            tokens: Collection::new(store, TOKENS),
            hasher: PasswordHasher::default(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Lifetime of tokens issued from now on.
    pub fn with_token_ttl(mut self, secs: i64) -> Self {
        self.token_ttl_secs = secs;
        self
    }

    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Create a customer account and sign it in.
    pub fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError> {
        validate::registration(&request.name, &request.email, &request.password)?;
        let user = self.create_user(
            request.name.trim(),
            &request.email,
            &request.password,
            Role::Customer,
        )?;
        info!(user_id = %user.id, "user registered");
        self.issue(user)
    }

    /// Check credentials and issue a fresh token.
    pub fn login(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        validate::login(&credentials.email, &credentials.password)?;

        let record = self
            .find_by_email(&credentials.email)?
            .ok_or(AuthError::InvalidCredentials)?;
        if !self.hasher.verify(&credentials.password, &record.password_hash)? {
            warn!(user_id = %record.user.id, "failed login");
            return Err(AuthError::InvalidCredentials);
        }

        debug!(user_id = %record.user.id, "login");
        self.issue(record.user)
    }

    /// Revoke a token. Returns whether it existed.
    pub fn logout(&self, token: &str) -> Result<bool, AuthError> {
        Ok(self.tokens.delete(token)?)
    }

    /// Resolve a bearer token to its user.
    pub fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let issued = self.tokens.get(token)?.ok_or(AuthError::InvalidToken)?;
        if issued.is_expired() {
            self.tokens.delete(token)?;
            return Err(AuthError::TokenExpired);
        }

        match self.users.get(issued.user_id.as_str())? {
            Some(record) => Ok(record.user),
            None => {
                self.tokens.delete(token)?;
                Err(AuthError::InvalidToken)
            }
        }
    }

    pub fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.users.list()?.into_iter().map(|r| r.user).collect())
    }

    pub fn get_user(&self, id: &UserId) -> Result<User, AuthError> {
        Ok(self.record(id)?.user)
    }

    /// Apply a partial update. Fields that are set are validated first.
    ///
    /// Whether the caller may change `role` is decided by the caller.
    pub fn update_user(&self, id: &UserId, update: &UserUpdate) -> Result<User, AuthError> {
        validate::update(
            update.name.as_deref(),
            update.email.as_deref(),
            update.password.as_deref(),
        )?;
        let mut record = self.record(id)?;

        if let Some(name) = &update.name {
            record.user.name = name.trim().to_string();
        }
        if let Some(email) = &update.email {
            let email = normalize_email(email);
            if email != record.user.email {
                if !self.emails.insert_new(&email, &id.to_string())? {
                    return Err(AuthError::UserAlreadyExists(email));
                }
                self.emails.delete(&record.user.email)?;
                record.user.email = email;
            }
        }
        if let Some(password) = &update.password {
            record.set_password_hash(self.hasher.hash(password)?);
        }
        if let Some(role) = update.role {
            record.user.role = role;
        }

        record.touch();
        self.users.put(id.as_str(), &record)?;
        Ok(record.user)
    }

    /// Delete a user together with its email entry and tokens.
    pub fn delete_user(&self, id: &UserId) -> Result<(), AuthError> {
        let record = self.record(id)?;
        self.users.delete(id.as_str())?;
        self.emails.delete(&record.user.email)?;

        let mut revoked = 0;
        for token in self.tokens.list()? {
            if &token.user_id == id {
                self.tokens.delete(&token.token)?;
                revoked += 1;
            }
        }
        info!(user_id = %id, revoked, "user deleted");
        Ok(())
    }

    /// Make sure an administrator with this email exists.
    ///
    /// An existing account is promoted and keeps its password; otherwise a
    /// new admin account is created with `password`.
    pub fn ensure_admin(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if let Some(mut record) = self.find_by_email(email)? {
            if record.user.role != Role::Admin {
                record.user.role = Role::Admin;
                record.touch();
                self.users.put(record.user.id.as_str(), &record)?;
                info!(user_id = %record.user.id, "promoted existing user to admin");
            }
            return Ok(record.user);
        }

        validate::registration(ADMIN_NAME, email, password)?;
        let user = self.create_user(ADMIN_NAME, email, password, Role::Admin)?;
        info!(user_id = %user.id, "admin account created");
        Ok(user)
    }

    /// Drop expired tokens. Returns how many were removed.
    pub fn purge_expired_tokens(&self) -> Result<usize, AuthError> {
        let mut purged = 0;
        for token in self.tokens.list()? {
            if token.is_expired() {
                self.tokens.delete(&token.token)?;
                purged += 1;
            }
        }
        Ok(purged)
    }

    fn record(&self, id: &UserId) -> Result<UserRecord, AuthError> {
        self.users
            .get(id.as_str())?
            .ok_or_else(|| AuthError::UserNotFound(id.to_string()))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let Some(id) = self.emails.get(&normalize_email(email))? else {
            return Ok(None);
        };
        Ok(self.users.get(&id)?)
    }

    fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let email = normalize_email(email);
        let hash = self.hasher.hash(password)?;
        let user = User::new(UserId::generate(), name, email.clone(), role);

        if !self.emails.insert_new(&email, &user.id.to_string())? {
            return Err(AuthError::UserAlreadyExists(email));
        }
        if let Err(e) = self.users.put(user.id.as_str(), &UserRecord::new(user.clone(), hash)) {
            // release the address so a retry can claim it
            let _ = self.emails.delete(&email);
            return Err(e.into());
        }
        Ok(user)
    }

    fn issue(&self, user: User) -> Result<AuthResponse, AuthError> {
        let token = AuthToken::generate_with_expiry(user.id.clone(), self.token_ttl_secs);
        self.tokens.put(&token.token, &token)?;
        Ok(AuthResponse {
            token_expiry: Some(token.expires_at_millis()),
            token: token.token,
            user,
        })
    }
}
