//! Settings handlers

use axum::{extract::State, Extension, Json};

use shared::SyncAction;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Settings, SettingsUpdate};
use crate::db::repository::SettingsRepository;
use crate::utils::{validate, AppResult};

const PERMISSION: &str = "manage_settings";
const SETTINGS_ID: &str = "settings:main";

/// GET /api/settings
pub async fn get_settings(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Settings>> {
    user.require(PERMISSION)?;
    let settings = SettingsRepository::new(state.db.clone()).get_or_create().await?;
    Ok(Json(settings))
}

/// PUT /api/settings
pub async fn update_settings(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<SettingsUpdate>,
) -> AppResult<Json<Settings>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    let settings = SettingsRepository::new(state.db.clone()).update(payload).await?;
    state.broadcast_sync("settings", SyncAction::Updated, SETTINGS_ID, Some(&settings));
    tracing::info!(by = %user.id, "Settings updated");
    Ok(Json(settings))
}
