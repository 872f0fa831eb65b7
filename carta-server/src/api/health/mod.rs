//! Health check

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::core::ServerState;

async fn health(State(state): State<ServerState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
    }))
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}
