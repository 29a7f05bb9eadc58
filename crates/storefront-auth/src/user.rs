//! User types.

use crate::AuthError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use storefront_commerce::UserId;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer.
    #[default]
    #[serde(alias = "user")]
    Customer,
    /// Store administrator.
    Admin,
}

impl Role {
    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }

    /// Permissions granted by this role.
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Customer => &[Permission::Read, Permission::Purchase],
            Role::Admin => &[
                Permission::Admin,
                Permission::Create,
                Permission::Read,
                Permission::Update,
                Permission::Delete,
                Permission::ManageUsers,
            ],
        }
    }

    /// Admins hold every permission, listed or not.
    pub fn has_permission(&self, permission: Permission) -> bool {
        *self == Role::Admin || self.permissions().contains(&permission)
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" | "user" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something a user may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Admin,
    Create,
    Read,
    Update,
    Delete,
    ManageUsers,
    Purchase,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Admin => "admin",
            Permission::Create => "create",
            Permission::Read => "read",
            Permission::Update => "update",
            Permission::Delete => "delete",
            Permission::ManageUsers => "manage_users",
            Permission::Purchase => "purchase",
        }
    }
}

/// A user's public profile. This is what the API returns and what clients
/// keep in their session; it never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role.has_permission(permission)
    }

    /// `Err(InsufficientPermissions)` unless the user holds `permission`.
    pub fn require(&self, permission: Permission) -> Result<(), AuthError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }

    /// Admins may act on anyone, everyone else only on themselves.
    pub fn can_manage(&self, target: &UserId) -> bool {
        self.is_admin() || &self.id == target
    }
}

/// Stored user: profile plus credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,
    /// Argon2 PHC string.
    pub password_hash: String,
    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(user: User, password_hash: impl Into<String>) -> Self {
        let updated_at = user.created_at;
        Self {
            user,
            password_hash: password_hash.into(),
            updated_at,
        }
    }

    /// Update password hash.
    pub fn set_password_hash(&mut self, hash: impl Into<String>) {
        self.password_hash = hash.into();
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Partial profile update. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none() && self.role.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User::new(UserId::new("u1"), "Ada", "ada@example.com", role)
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::Customer.has_permission(Permission::Read));
        assert!(Role::Customer.has_permission(Permission::Purchase));
        assert!(!Role::Customer.has_permission(Permission::Delete));
        assert!(Role::Admin.has_permission(Permission::ManageUsers));
        // not in the admin list, still granted
        assert!(Role::Admin.has_permission(Permission::Purchase));
    }

    #[test]
    fn test_role_parsing_and_serde() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("user".parse::<Role>(), Ok(Role::Customer));
        assert!("root".parse::<Role>().is_err());
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "admin");
    }

    #[test]
    fn test_require_and_can_manage() {
        let customer = user(Role::Customer);
        assert!(customer.require(Permission::Read).is_ok());
        assert!(matches!(
            customer.require(Permission::ManageUsers),
            Err(AuthError::InsufficientPermissions)
        ));
        assert!(customer.can_manage(&UserId::new("u1")));
        assert!(!customer.can_manage(&UserId::new("u2")));
        assert!(user(Role::Admin).can_manage(&UserId::new("u2")));
    }

    #[test]
    fn test_record_serializes_flat_and_profile_hides_hash() {
        let record = UserRecord::new(user(Role::Customer), "$argon2id$fake");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["passwordHash"], "$argon2id$fake");

        let profile = serde_json::to_value(&record.user).unwrap();
        assert!(profile.get("passwordHash").is_none());
        assert_eq!(profile["role"], "customer");
    }

    #[test]
    fn test_user_accepts_document_store_shape() {
        let json = serde_json::json!({"_id": "abc", "name": "Bo", "email": "bo@example.com"});
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.id, UserId::new("abc"));
        assert_eq!(user.role, Role::Customer);
    }
}
