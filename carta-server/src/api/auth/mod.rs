//! Authentication routes

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/change-password", post(handler::change_password))
}
