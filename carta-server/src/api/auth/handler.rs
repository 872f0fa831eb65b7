//! Authentication handlers

use std::time::Duration;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::UserResponse;
use crate::db::repository::UserRepository;
use crate::utils::{validate, AppError, AppResult};

/// Fixed delay for authentication to blunt timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate(&req)?;
    let repo = UserRepository::new(state.db.clone());
    let user = repo.find_by_email(&req.email).await?;

    // Delay before inspecting the result so found/not-found take the same time
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) if UserRepository::verify_password(&req.password, &u.password_hash) => u,
        Some(_) | None => {
            tracing::warn!(email = %req.email, "Login failed");
            return Err(AppError::invalid_credentials());
        }
    };

    if !user.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let user_id = user.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
    let permissions = user.permissions.granted();
    let token = state
        .jwt_service
        .generate_token(
            &user_id,
            &user.email,
            &user.name,
            user.role.as_str(),
            &permissions,
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    repo.touch_last_login(&user_id).await?;
    tracing::info!(user_id = %user_id, email = %user.email, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current_user.id)))?;
    Ok(Json(UserResponse::from(user)))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<()>> {
    validate(&req)?;
    let repo = UserRepository::new(state.db.clone());
    repo.change_password(&current_user.id, &req.current_password, &req.new_password)
        .await?;
    tracing::info!(user_id = %current_user.id, "Password changed");
    Ok(Json(()))
}
