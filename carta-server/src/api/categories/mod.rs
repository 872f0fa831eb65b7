//! Category registry routes

mod handler;

use axum::{
    routing::{get, put},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/categories",
            get(handler::get_registry).post(handler::add),
        )
        .route(
            "/api/categories/{kind}/{entry_id}",
            put(handler::rename).delete(handler::remove),
        )
}
