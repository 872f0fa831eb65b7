//! Product administration routes

mod handler;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/products", get(handler::list).post(handler::create))
        .route(
            "/api/products/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/api/products/{id}/variations", post(handler::add_variation))
        .route(
            "/api/products/{id}/variations/{variation_id}",
            put(handler::update_variation).delete(handler::remove_variation),
        )
}
