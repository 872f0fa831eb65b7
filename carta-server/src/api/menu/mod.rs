//! Public menu routes
//!
//! Everything under `/api/menu/` is reachable without a token: the menu
//! itself, the category lists, active waiters, and the customer-facing
//! rating endpoints. Rating writes are gated by the restaurant settings.

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/menu/products", get(handler::list_products))
        .route("/api/menu/products/kind/{kind}", get(handler::list_by_kind))
        .route(
            "/api/menu/products/kind/{kind}/category/{category}",
            get(handler::list_by_category),
        )
        .route(
            "/api/menu/products/{id}/ratings",
            post(handler::rate_product),
        )
        .route("/api/menu/categories", get(handler::list_categories))
        .route("/api/menu/waiters", get(handler::list_waiters))
        .route("/api/menu/waiters/{id}/ratings", post(handler::rate_waiter))
        .route(
            "/api/menu/waiters/{id}/ratings/{rating_id}/like",
            post(handler::like_waiter_rating),
        )
        .route("/api/menu/settings", get(handler::public_settings))
}
