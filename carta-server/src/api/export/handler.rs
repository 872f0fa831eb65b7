//! Catalog export/import handlers

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use shared::SyncAction;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::CategoryRegistry;
use crate::db::repository::{CategoryRepository, ProductRepository};
use crate::services::catalog_export::ImportSummary;
use crate::services::CatalogExporter;
use crate::utils::{AppError, AppResult};

const PERMISSION: &str = "manage_products";

/// GET /api/export/catalog - download the catalog as a ZIP
pub async fn export(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    user.require(PERMISSION)?;
    let exporter = CatalogExporter::new(state.db.clone(), state.config.images_dir());
    let zip_bytes = exporter.export_zip().await?;
    tracing::info!(by = %user.id, size = zip_bytes.len(), "Catalog exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"catalog_export.zip\"",
            ),
        ],
        zip_bytes,
    ))
}

/// POST /api/export/catalog - replace the catalog from an export ZIP
pub async fn import(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    body: Bytes,
) -> AppResult<Json<ImportSummary>> {
    user.require(PERMISSION)?;
    let exporter = CatalogExporter::new(state.db.clone(), state.config.images_dir());
    let summary = exporter.import_zip(body.as_ref()).await?;
    tracing::info!(
        by = %user.id,
        products = summary.products,
        categories = summary.categories,
        "Catalog imported"
    );

    // Ids were remapped; push fresh snapshots from the database
    for product in ProductRepository::new(state.db.clone()).find_all().await? {
        let id = product.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
        state.broadcast_sync("product", SyncAction::Created, &id, Some(&product));
    }
    let registry: CategoryRegistry = CategoryRepository::new(state.db.clone())
        .get_or_create()
        .await?;
    state.broadcast_sync(
        "category",
        SyncAction::Updated,
        "category_registry:main",
        Some(&registry),
    );

    Ok(Json(summary))
}
