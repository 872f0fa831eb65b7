//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`auth`] - login and session management
//! - [`menu`] - public menu and rating endpoints (no auth)
//! - [`products`] - product administration
//! - [`categories`] - category registry administration
//! - [`waiters`] - waiter administration
//! - [`users`] - admin user management
//! - [`settings`] - restaurant settings
//! - [`upload`] - image upload and serving
//! - [`export`] - catalog export/import

pub mod auth;
pub mod categories;
pub mod export;
pub mod health;
pub mod menu;
pub mod products;
pub mod settings;
pub mod upload;
pub mod users;
pub mod waiters;

use axum::{middleware, Router};
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// HTTP access log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());

    response
}

/// Build the router without state (tests compose their own layers).
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(auth::router())
        .merge(health::router())
        .merge(upload::router())
        .merge(menu::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(waiters::router())
        .merge(users::router())
        .merge(settings::router())
        .merge(export::router())
}

/// Build the full application router with middleware applied.
pub fn create_router(state: ServerState) -> Router {
    build_app()
        // require_auth skips the public routes internally
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(log_request))
}
