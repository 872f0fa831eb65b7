//! Category registry handlers
//!
//! Entries are addressed by surrogate id in the URL. Rename also retargets
//! products referencing the old name; delete leaves products untouched.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use shared::models::ProductKind;
use shared::SyncAction;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CategoryAdd, CategoryRegistry, CategoryRename};
use crate::db::repository::CategoryRepository;
use crate::utils::{validate, AppError, AppResult};

const PERMISSION: &str = "manage_categories";
const REGISTRY_ID: &str = "category_registry:main";

fn parse_kind(kind: &str) -> Result<ProductKind, AppError> {
    kind.parse().map_err(AppError::Validation)
}

/// GET /api/categories
pub async fn get_registry(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<CategoryRegistry>> {
    user.require(PERMISSION)?;
    let registry = CategoryRepository::new(state.db.clone())
        .get_or_create()
        .await?;
    Ok(Json(registry))
}

/// POST /api/categories
pub async fn add(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CategoryAdd>,
) -> AppResult<Json<CategoryRegistry>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    let registry = CategoryRepository::new(state.db.clone())
        .add(payload.kind, &payload.name)
        .await?;
    state.broadcast_sync("category", SyncAction::Updated, REGISTRY_ID, Some(&registry));
    Ok(Json(registry))
}

/// PUT /api/categories/:kind/:entry_id
pub async fn rename(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((kind, entry_id)): Path<(String, Uuid)>,
    Json(payload): Json<CategoryRename>,
) -> AppResult<Json<CategoryRegistry>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    let kind = parse_kind(&kind)?;
    let registry = CategoryRepository::new(state.db.clone())
        .rename(kind, entry_id, &payload.name)
        .await?;
    state.broadcast_sync("category", SyncAction::Updated, REGISTRY_ID, Some(&registry));
    tracing::info!(%entry_id, new_name = %payload.name, "Category renamed");
    Ok(Json(registry))
}

/// DELETE /api/categories/:kind/:entry_id
pub async fn remove(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((kind, entry_id)): Path<(String, Uuid)>,
) -> AppResult<Json<CategoryRegistry>> {
    user.require(PERMISSION)?;
    let kind = parse_kind(&kind)?;
    let registry = CategoryRepository::new(state.db.clone())
        .remove(kind, entry_id)
        .await?;
    state.broadcast_sync("category", SyncAction::Updated, REGISTRY_ID, Some(&registry));
    Ok(Json(registry))
}
