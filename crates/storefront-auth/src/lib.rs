//! Authentication for the storefront.
//!
//! Provides user accounts, roles and permissions, password hashing, bearer
//! tokens, the client-side persisted session and form validators.

mod error;
mod password;
mod service;
mod session;
mod token;
mod user;
pub mod validate;

pub use error::AuthError;
pub use password::PasswordHasher;
pub use service::{AuthService, Credentials, RegisterRequest};
pub use session::{AuthResponse, ClientSession, TOKEN_EXPIRY_KEY, TOKEN_KEY, USER_KEY};
pub use token::{AuthToken, DEFAULT_TOKEN_TTL_SECS};
pub use user::{Permission, Role, User, UserRecord, UserUpdate};
