//! Image upload and serving routes
//!
//! Upload requires a token; serving is public so menu clients can load
//! product and waiter photos directly.

mod handler;

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use http::header;

use crate::core::ServerState;

async fn serve_image(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> impl IntoResponse {
    match state.image_store.read(&filename).await {
        Ok(content) => (
            http::StatusCode::OK,
            [(header::CONTENT_TYPE, "image/jpeg")],
            Bytes::from(content),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/image/upload", post(handler::upload))
        .route("/api/image/{filename}", get(serve_image))
}
