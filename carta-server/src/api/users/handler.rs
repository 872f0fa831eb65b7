//! User administration handlers
//!
//! Only superadmins may touch superadmin accounts, and nobody deletes
//! themselves; everything else is gated on `manage_users`.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Role, UserCreate, UserResponse, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::{validate, AppError, AppResult};

const PERMISSION: &str = "manage_users";

fn same_user(current: &CurrentUser, id: &str) -> bool {
    let key = id.strip_prefix("user:").unwrap_or(id);
    let current_key = current.id.strip_prefix("user:").unwrap_or(&current.id);
    key == current_key
}

/// GET /api/users
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<UserResponse>>> {
    user.require(PERMISSION)?;
    let users = UserRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(users))
}

/// GET /api/users/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    user.require(PERMISSION)?;
    let found = UserRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id}")))?;
    Ok(Json(UserResponse::from(found)))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserResponse>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    if payload.role == Role::Superadmin && !user.is_superadmin() {
        return Err(AppError::forbidden(
            "Only a superadmin may create superadmin accounts",
        ));
    }
    let created = UserRepository::new(state.db.clone())
        .create(payload, Some(user.id.clone()))
        .await?;
    tracing::info!(user = %created.id, email = %created.email, "User created");
    Ok(Json(created))
}

/// PUT /api/users/:id
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    user.require(PERMISSION)?;
    validate(&payload)?;

    let repo = UserRepository::new(state.db.clone());
    let target = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id}")))?;
    if (target.role == Role::Superadmin || payload.role == Some(Role::Superadmin))
        && !user.is_superadmin()
    {
        return Err(AppError::forbidden(
            "Only a superadmin may modify superadmin accounts",
        ));
    }

    let updated = repo.update(&id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/users/:id
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<()>> {
    user.require(PERMISSION)?;
    if same_user(&user, &id) {
        return Err(AppError::validation("You cannot delete your own account"));
    }

    let repo = UserRepository::new(state.db.clone());
    let target = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id}")))?;
    if target.role == Role::Superadmin && !user.is_superadmin() {
        return Err(AppError::forbidden(
            "Only a superadmin may delete superadmin accounts",
        ));
    }

    repo.delete(&id).await?;
    tracing::info!(user = %id, deleted_by = %user.id, "User deleted");
    Ok(Json(()))
}
