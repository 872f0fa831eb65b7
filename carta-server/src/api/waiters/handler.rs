//! Waiter administration handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use shared::SyncAction;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    NoteCreate, NoteUpdate, ShiftCreate, ShiftStatusUpdate, TableClose, TableOpen, Waiter,
    WaiterCreate, WaiterUpdate,
};
use crate::db::repository::WaiterRepository;
use crate::utils::{validate, AppError, AppResult};

const PERMISSION: &str = "manage_waiters";

fn entity_id(waiter: &Waiter) -> String {
    waiter.id.as_ref().map(|i| i.to_string()).unwrap_or_default()
}

/// GET /api/waiters - all waiters, inactive included
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Waiter>>> {
    user.require(PERMISSION)?;
    let waiters = WaiterRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(waiters))
}

/// GET /api/waiters/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Waiter>> {
    user.require(PERMISSION)?;
    let waiter = WaiterRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Waiter {id}")))?;
    Ok(Json(waiter))
}

/// POST /api/waiters
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<WaiterCreate>,
) -> AppResult<Json<Waiter>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    let waiter = WaiterRepository::new(state.db.clone()).create(payload).await?;
    let id = entity_id(&waiter);
    state.broadcast_sync("waiter", SyncAction::Created, &id, Some(&waiter));
    tracing::info!(waiter = %id, name = %waiter.name, "Waiter created");
    Ok(Json(waiter))
}

/// PUT /api/waiters/:id
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<WaiterUpdate>,
) -> AppResult<Json<Waiter>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    let waiter = WaiterRepository::new(state.db.clone())
        .update(&id, payload)
        .await?;
    state.broadcast_sync("waiter", SyncAction::Updated, &id, Some(&waiter));
    Ok(Json(waiter))
}

/// DELETE /api/waiters/:id
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<()>> {
    user.require(PERMISSION)?;
    WaiterRepository::new(state.db.clone()).delete(&id).await?;
    state.broadcast_sync::<Waiter>("waiter", SyncAction::Deleted, &id, None);
    tracing::info!(waiter = %id, "Waiter deleted");
    Ok(Json(()))
}

/// POST /api/waiters/:id/ratings/:rating_id/highlight
pub async fn toggle_highlight(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, rating_id)): Path<(String, i64)>,
) -> AppResult<Json<Waiter>> {
    user.require(PERMISSION)?;
    let waiter = WaiterRepository::new(state.db.clone())
        .toggle_highlight(&id, rating_id)
        .await?;
    state.broadcast_sync("waiter", SyncAction::Updated, &id, Some(&waiter));
    Ok(Json(waiter))
}

/// POST /api/waiters/:id/notes
pub async fn add_note(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<NoteCreate>,
) -> AppResult<Json<Waiter>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    let waiter = WaiterRepository::new(state.db.clone())
        .add_note(&id, payload.into_note())
        .await?;
    state.broadcast_sync("waiter", SyncAction::Updated, &id, Some(&waiter));
    Ok(Json(waiter))
}

/// PUT /api/waiters/:id/notes/:note_id
pub async fn update_note(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, note_id)): Path<(String, i64)>,
    Json(payload): Json<NoteUpdate>,
) -> AppResult<Json<Waiter>> {
    user.require(PERMISSION)?;
    validate(&payload)?;

    let repo = WaiterRepository::new(state.db.clone());
    let current = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Waiter {id}")))?;
    let mut note = current
        .notes
        .iter()
        .find(|n| n.id == note_id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("Note {note_id}")))?;
    if let Some(kind) = payload.kind {
        note.kind = kind;
    }
    if let Some(content) = payload.content {
        note.content = content;
    }

    let waiter = repo.update_note(&id, note).await?;
    state.broadcast_sync("waiter", SyncAction::Updated, &id, Some(&waiter));
    Ok(Json(waiter))
}

/// DELETE /api/waiters/:id/notes/:note_id
pub async fn remove_note(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, note_id)): Path<(String, i64)>,
) -> AppResult<Json<Waiter>> {
    user.require(PERMISSION)?;
    let waiter = WaiterRepository::new(state.db.clone())
        .remove_note(&id, note_id)
        .await?;
    state.broadcast_sync("waiter", SyncAction::Updated, &id, Some(&waiter));
    Ok(Json(waiter))
}

/// POST /api/waiters/:id/shifts
pub async fn add_shift(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<ShiftCreate>,
) -> AppResult<Json<Waiter>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    let waiter = WaiterRepository::new(state.db.clone())
        .add_shift(&id, payload.into_shift())
        .await?;
    state.broadcast_sync("waiter", SyncAction::Updated, &id, Some(&waiter));
    Ok(Json(waiter))
}

/// PUT /api/waiters/:id/shifts/:shift_id/status
pub async fn update_shift_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, shift_id)): Path<(String, i64)>,
    Json(payload): Json<ShiftStatusUpdate>,
) -> AppResult<Json<Waiter>> {
    user.require(PERMISSION)?;
    let waiter = WaiterRepository::new(state.db.clone())
        .update_shift_status(&id, shift_id, payload.status)
        .await?;
    state.broadcast_sync("waiter", SyncAction::Updated, &id, Some(&waiter));
    Ok(Json(waiter))
}

/// POST /api/waiters/:id/tables
pub async fn open_table(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<TableOpen>,
) -> AppResult<Json<Waiter>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    let waiter = WaiterRepository::new(state.db.clone())
        .open_table(&id, payload.into_table())
        .await?;
    state.broadcast_sync("waiter", SyncAction::Updated, &id, Some(&waiter));
    Ok(Json(waiter))
}

/// POST /api/waiters/:id/tables/:table_id/close
pub async fn close_table(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, table_id)): Path<(String, i64)>,
    Json(payload): Json<TableClose>,
) -> AppResult<Json<Waiter>> {
    user.require(PERMISSION)?;
    if payload.total_amount.is_sign_negative() || payload.tip_amount.is_sign_negative() {
        return Err(AppError::validation("Amounts must not be negative"));
    }
    let waiter = WaiterRepository::new(state.db.clone())
        .close_table(&id, table_id, payload)
        .await?;
    state.broadcast_sync("waiter", SyncAction::Updated, &id, Some(&waiter));
    Ok(Json(waiter))
}
