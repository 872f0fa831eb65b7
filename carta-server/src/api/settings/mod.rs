//! Settings routes

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/settings",
        get(handler::get_settings).put(handler::update_settings),
    )
}
