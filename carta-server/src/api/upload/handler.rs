//! Image upload handler

use axum::extract::{Multipart, State};
use axum::{Extension, Json};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::StoredImage;
use crate::utils::{AppError, AppResult};

/// POST /api/image/upload - multipart form with a `file` field
pub async fn upload(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Json<StoredImage>> {
    let mut data: Option<Vec<u8>> = None;
    let mut original_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            original_name = field.file_name().map(|s| s.to_string());
            data = Some(field.bytes().await?.to_vec());
            break;
        }
    }

    let data = data.ok_or_else(|| {
        AppError::validation("No 'file' field found. Field name must be 'file'")
    })?;
    let original_name =
        original_name.ok_or_else(|| AppError::validation("No filename provided"))?;

    let stored = state.image_store.store(data, &original_name).await?;
    tracing::info!(
        by = %user.id,
        original_name = %stored.original_name,
        filename = %stored.filename,
        size = stored.size,
        "Image uploaded"
    );
    Ok(Json(stored))
}
