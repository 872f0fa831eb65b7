//! Public menu handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use shared::models::ProductKind;
use shared::SyncAction;

use crate::core::ServerState;
use crate::db::models::{
    CategoryRegistry, Product, ProductRatingCreate, Waiter, WaiterRatingCreate,
};
use crate::db::repository::{
    CategoryRepository, ProductRepository, SettingsRepository, WaiterRepository,
};
use crate::utils::{validate, AppError, AppResult};

fn parse_kind(kind: &str) -> Result<ProductKind, AppError> {
    kind.parse().map_err(AppError::Validation)
}

/// GET /api/menu/products - all active products
pub async fn list_products(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.db.clone()).find_active().await?;
    Ok(Json(products))
}

/// GET /api/menu/products/kind/:kind
pub async fn list_by_kind(
    State(state): State<ServerState>,
    Path(kind): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    let kind = parse_kind(&kind)?;
    let products = ProductRepository::new(state.db.clone())
        .find_by_kind(kind)
        .await?;
    Ok(Json(products))
}

/// GET /api/menu/products/kind/:kind/category/:category
pub async fn list_by_category(
    State(state): State<ServerState>,
    Path((kind, category)): Path<(String, String)>,
) -> AppResult<Json<Vec<Product>>> {
    let kind = parse_kind(&kind)?;
    let products = ProductRepository::new(state.db.clone())
        .find_by_category(kind, &category)
        .await?;
    Ok(Json(products))
}

/// GET /api/menu/categories
pub async fn list_categories(
    State(state): State<ServerState>,
) -> AppResult<Json<CategoryRegistry>> {
    let registry = CategoryRepository::new(state.db.clone())
        .get_or_create()
        .await?;
    Ok(Json(registry))
}

/// GET /api/menu/waiters - active waiters for the rating screen
pub async fn list_waiters(State(state): State<ServerState>) -> AppResult<Json<Vec<Waiter>>> {
    let waiters = WaiterRepository::new(state.db.clone()).find_active().await?;
    Ok(Json(waiters))
}

/// POST /api/menu/products/:id/ratings
///
/// Rejected outright when ratings are disabled in settings.
pub async fn rate_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductRatingCreate>,
) -> AppResult<Json<Product>> {
    validate(&payload)?;

    let settings = SettingsRepository::new(state.db.clone()).get_or_create().await?;
    if !settings.enable_ratings {
        return Err(AppError::forbidden("Product ratings are disabled"));
    }

    let product = ProductRepository::new(state.db.clone())
        .add_rating(&id, payload.into_rating())
        .await?;
    state.broadcast_sync("product", SyncAction::Updated, &id, Some(&product));
    Ok(Json(product))
}

/// POST /api/menu/waiters/:id/ratings
///
/// Gated on `enable_waiter_ratings`; when `require_table_number` is set the
/// payload must carry one.
pub async fn rate_waiter(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<WaiterRatingCreate>,
) -> AppResult<Json<Waiter>> {
    validate(&payload)?;

    let settings = SettingsRepository::new(state.db.clone()).get_or_create().await?;
    if !settings.enable_waiter_ratings {
        return Err(AppError::forbidden("Waiter ratings are disabled"));
    }
    if settings.require_table_number && payload.table_number.is_none() {
        return Err(AppError::validation("A table number is required"));
    }
    if payload.tip.is_some_and(|tip| tip.is_sign_negative()) {
        return Err(AppError::validation("Tip must not be negative"));
    }

    let waiter = WaiterRepository::new(state.db.clone())
        .add_rating(&id, payload.into_rating())
        .await?;
    state.broadcast_sync("waiter", SyncAction::Updated, &id, Some(&waiter));
    Ok(Json(waiter))
}

/// POST /api/menu/waiters/:id/ratings/:rating_id/like
pub async fn like_waiter_rating(
    State(state): State<ServerState>,
    Path((id, rating_id)): Path<(String, i64)>,
) -> AppResult<Json<Waiter>> {
    let waiter = WaiterRepository::new(state.db.clone())
        .like_rating(&id, rating_id)
        .await?;
    state.broadcast_sync("waiter", SyncAction::Updated, &id, Some(&waiter));
    Ok(Json(waiter))
}

/// Display subset of the settings, safe without a token.
#[derive(Debug, Serialize)]
pub struct PublicSettings {
    pub restaurant_name: String,
    pub enable_ratings: bool,
    pub enable_waiter_ratings: bool,
    pub require_table_number: bool,
    pub dark_mode: bool,
}

/// GET /api/menu/settings
pub async fn public_settings(
    State(state): State<ServerState>,
) -> AppResult<Json<PublicSettings>> {
    let settings = SettingsRepository::new(state.db.clone()).get_or_create().await?;
    Ok(Json(PublicSettings {
        restaurant_name: settings.restaurant_name,
        enable_ratings: settings.enable_ratings,
        enable_waiter_ratings: settings.enable_waiter_ratings,
        require_table_number: settings.require_table_number,
        dark_mode: settings.dark_mode,
    }))
}
