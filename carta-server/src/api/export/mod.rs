//! Catalog export/import routes

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/export/catalog",
        get(handler::export).post(handler::import),
    )
}
