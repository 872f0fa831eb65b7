//! Product administration handlers
//!
//! Every write broadcasts the full post-write entity on the sync bus, so
//! live views replace their copy wholesale.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use shared::models::Variation;
use shared::SyncAction;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate, VariationCreate};
use crate::db::repository::ProductRepository;
use crate::utils::{validate, AppResult};

const PERMISSION: &str = "manage_products";

fn entity_id(product: &Product) -> String {
    product.id.as_ref().map(|i| i.to_string()).unwrap_or_default()
}

/// GET /api/products - all products, inactive included
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Product>>> {
    user.require(PERMISSION)?;
    let products = ProductRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(products))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    user.require(PERMISSION)?;
    let product = ProductRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| crate::utils::AppError::not_found(format!("Product {id}")))?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    let product = ProductRepository::new(state.db.clone()).create(payload).await?;
    let id = entity_id(&product);
    state.broadcast_sync("product", SyncAction::Created, &id, Some(&product));
    tracing::info!(product = %id, name = %product.name, "Product created");
    Ok(Json(product))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    let product = ProductRepository::new(state.db.clone())
        .update(&id, payload)
        .await?;
    state.broadcast_sync("product", SyncAction::Updated, &id, Some(&product));
    Ok(Json(product))
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<()>> {
    user.require(PERMISSION)?;
    ProductRepository::new(state.db.clone()).delete(&id).await?;
    state.broadcast_sync::<Product>("product", SyncAction::Deleted, &id, None);
    tracing::info!(product = %id, "Product deleted");
    Ok(Json(()))
}

/// POST /api/products/:id/variations
pub async fn add_variation(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<VariationCreate>,
) -> AppResult<Json<Product>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    let product = ProductRepository::new(state.db.clone())
        .add_variation(&id, payload.into_variation())
        .await?;
    state.broadcast_sync("product", SyncAction::Updated, &id, Some(&product));
    Ok(Json(product))
}

/// PUT /api/products/:id/variations/:variation_id
pub async fn update_variation(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, variation_id)): Path<(String, i64)>,
    Json(payload): Json<VariationCreate>,
) -> AppResult<Json<Product>> {
    user.require(PERMISSION)?;
    validate(&payload)?;
    let variation = Variation {
        id: variation_id,
        name: payload.name,
        price: payload.price,
        tags: payload.tags,
    };
    let product = ProductRepository::new(state.db.clone())
        .update_variation(&id, variation)
        .await?;
    state.broadcast_sync("product", SyncAction::Updated, &id, Some(&product));
    Ok(Json(product))
}

/// DELETE /api/products/:id/variations/:variation_id
pub async fn remove_variation(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, variation_id)): Path<(String, i64)>,
) -> AppResult<Json<Product>> {
    user.require(PERMISSION)?;
    let product = ProductRepository::new(state.db.clone())
        .remove_variation(&id, variation_id)
        .await?;
    state.broadcast_sync("product", SyncAction::Updated, &id, Some(&product));
    Ok(Json(product))
}
