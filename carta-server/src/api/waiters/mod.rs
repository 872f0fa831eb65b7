//! Waiter administration routes

mod handler;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/waiters", get(handler::list).post(handler::create))
        .route(
            "/api/waiters/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/api/waiters/{id}/ratings/{rating_id}/highlight",
            post(handler::toggle_highlight),
        )
        .route("/api/waiters/{id}/notes", post(handler::add_note))
        .route(
            "/api/waiters/{id}/notes/{note_id}",
            put(handler::update_note).delete(handler::remove_note),
        )
        .route("/api/waiters/{id}/shifts", post(handler::add_shift))
        .route(
            "/api/waiters/{id}/shifts/{shift_id}/status",
            put(handler::update_shift_status),
        )
        .route("/api/waiters/{id}/tables", post(handler::open_table))
        .route(
            "/api/waiters/{id}/tables/{table_id}/close",
            post(handler::close_table),
        )
}
