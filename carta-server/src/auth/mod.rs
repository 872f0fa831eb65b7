//! Authentication and authorization

pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use permissions::ALL_PERMISSIONS;

use crate::utils::AppError;

/// Authenticated user injected into request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl CurrentUser {
    pub fn is_superadmin(&self) -> bool {
        self.role == "superadmin"
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_superadmin() || self.permissions.iter().any(|p| p == permission)
    }

    /// Gate a handler on one capability flag.
    pub fn require(&self, permission: &str) -> Result<(), AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "missing permission {permission}"
            )))
        }
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role: claims.role,
            permissions: claims
                .permissions
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str, perms: &[&str]) -> CurrentUser {
        CurrentUser {
            id: "user:t".into(),
            email: "t@example.com".into(),
            name: "T".into(),
            role: role.into(),
            permissions: perms.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn superadmin_implies_everything() {
        let u = user("superadmin", &[]);
        assert!(u.has_permission("manage_users"));
    }

    #[test]
    fn flag_gates_are_enforced() {
        let u = user("user", &["view_reports"]);
        assert!(u.require("view_reports").is_ok());
        assert!(u.require("manage_products").is_err());
    }
}
