//! Authentication middleware
//!
//! Axum middleware validating the `Authorization: Bearer <token>` header and
//! injecting [`CurrentUser`] into request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// Paths that skip authentication:
/// - CORS preflight (`OPTIONS *`)
/// - non-`/api/` paths (static images, 404s)
/// - `/api/auth/login`
/// - `/api/health`
/// - the public menu under `/api/menu/`
/// - stored images (`GET /api/image/{filename}`)
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let is_public_api_route = path == "/api/auth/login"
        || path == "/api/health"
        || path.starts_with("/api/menu/")
        || (req.method() == http::Method::GET && path.starts_with("/api/image/"));
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::InvalidToken)?,
        None => {
            tracing::warn!(uri = %req.uri(), "request without authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(uri = %req.uri(), error = %e, "token validation failed");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}
