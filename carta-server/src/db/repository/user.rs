//! User repository

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::{record_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{PermissionFlags, Role, User, UserCreate, UserResponse, UserUpdate};

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn hash_password(password: &str) -> RepoResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))
    }

    pub fn verify_password(password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<UserResponse>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY name")
            .await?
            .take(0)?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let rid = record_id(TABLE, id)?;
        let user: Option<User> = self.base.db().select(rid).await?;
        Ok(user)
    }

    /// Internal lookup for login; includes the password hash.
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn create(&self, data: UserCreate, created_by: Option<String>) -> RepoResult<UserResponse> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User with email {} already exists",
                data.email
            )));
        }

        let permissions = data.permissions.unwrap_or(match data.role {
            Role::Superadmin | Role::Admin => PermissionFlags::all(),
            Role::User => PermissionFlags {
                view_reports: true,
                ..Default::default()
            },
        });

        let user = User {
            id: None,
            name: data.name,
            email: data.email,
            role: data.role,
            is_active: true,
            permissions,
            password_hash: Self::hash_password(&data.password)?,
            last_login: None,
            created_by,
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created
            .map(UserResponse::from)
            .ok_or_else(|| RepoError::Database("Failed to create user".into()))
    }

    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<UserResponse> {
        let rid = record_id(TABLE, id)?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.email.is_some() {
            set_parts.push("email = $email");
        }
        if data.role.is_some() {
            set_parts.push("role = $role");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }
        if data.permissions.is_some() {
            set_parts.push("permissions = $permissions");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .map(UserResponse::from)
                .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")));
        }

        let query_str = format!("UPDATE $record SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("record", rid));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.email {
            query = query.bind(("email", v));
        }
        if let Some(v) = data.role {
            query = query.bind(("role", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }
        if let Some(v) = data.permissions {
            query = query.bind(("permissions", v));
        }

        let users: Vec<User> = query.await?.take(0)?;
        users
            .into_iter()
            .next()
            .map(UserResponse::from)
            .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = record_id(TABLE, id)?;
        let deleted: Option<User> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("User {id} not found")));
        }
        Ok(())
    }

    pub async fn touch_last_login(&self, id: &str) -> RepoResult<()> {
        let rid = record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $record SET last_login = $now")
            .bind(("record", rid))
            .bind(("now", Utc::now()))
            .await?
            .check()?;
        Ok(())
    }

    pub async fn change_password(&self, id: &str, current: &str, new: &str) -> RepoResult<()> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))?;

        if !Self::verify_password(current, &user.password_hash) {
            return Err(RepoError::Validation("Current password is incorrect".into()));
        }

        let rid = record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $record SET password_hash = $hash")
            .bind(("record", rid))
            .bind(("hash", Self::hash_password(new)?))
            .await?
            .check()?;
        Ok(())
    }
}
