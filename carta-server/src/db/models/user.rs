//! Admin user model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

/// Admin role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

/// The six capability flags stored per user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionFlags {
    #[serde(default)]
    pub manage_products: bool,
    #[serde(default)]
    pub manage_categories: bool,
    #[serde(default)]
    pub manage_waiters: bool,
    #[serde(default)]
    pub manage_users: bool,
    #[serde(default)]
    pub manage_settings: bool,
    #[serde(default)]
    pub view_reports: bool,
}

impl PermissionFlags {
    pub fn all() -> Self {
        Self {
            manage_products: true,
            manage_categories: true,
            manage_waiters: true,
            manage_users: true,
            manage_settings: true,
            view_reports: true,
        }
    }

    /// Granted permission strings, in [`crate::auth::ALL_PERMISSIONS`] order.
    pub fn granted(&self) -> Vec<String> {
        let set = [
            self.manage_products,
            self.manage_categories,
            self.manage_waiters,
            self.manage_users,
            self.manage_settings,
            self.view_reports,
        ];
        crate::auth::ALL_PERMISSIONS
            .iter()
            .zip(set)
            .filter(|(_, on)| *on)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

/// Stored user document, password hash included. Never serialized to
/// clients; API responses use [`UserResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    #[serde(default)]
    pub permissions: PermissionFlags,
    pub password_hash: String,
    pub last_login: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

/// User response (without password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub permissions: PermissionFlags,
    pub last_login: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_string()).unwrap_or_default(),
            name: user.name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            permissions: user.permissions,
            last_login: user.last_login,
            created_by: user.created_by,
        }
    }
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: Role,
    pub permissions: Option<PermissionFlags>,
}

/// Update user payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub permissions: Option<PermissionFlags>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granted_matches_set_flags() {
        let flags = PermissionFlags {
            manage_products: true,
            view_reports: true,
            ..Default::default()
        };
        assert_eq!(flags.granted(), vec!["manage_products", "view_reports"]);
    }
}
