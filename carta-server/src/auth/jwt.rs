//! JWT token service
//!
//! Generation, validation and parsing of access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, generating an ephemeral development key");
                generate_printable_secret()
            } else {
                panic!("JWT_SECRET must be set in production");
            }
        });

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "carta-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "carta-admin".to_string()),
        }
    }
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (subject)
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Role name: superadmin | admin | user
    pub role: String,
    /// Comma-separated permission list
    pub permissions: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// Generate a printable random secret (development use)
pub fn generate_printable_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    let rng = SystemRandom::new();
    let mut out = String::with_capacity(64);
    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_ok() {
            out.push(ALLOWED[(byte[0] as usize) % ALLOWED.len()] as char);
        }
    }
    out
}

/// JWT service owning the keys derived from [`JwtConfig`]
#[derive(Debug, Clone)]
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Generate an access token for the given identity.
    pub fn generate_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        role: &str,
        permissions: &[String],
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            permissions: permissions.join(","),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate a token and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::InvalidToken(e.to_string()),
        })
    }

    /// Extract the bearer token from an `Authorization` header value.
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new(JwtConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-test-secret-test-secret!".into(),
            expiration_minutes: 10,
            issuer: "carta-server".into(),
            audience: "carta-admin".into(),
        })
    }

    #[test]
    fn round_trip_preserves_claims() {
        let svc = test_service();
        let token = svc
            .generate_token(
                "user:abc",
                "ana@example.com",
                "Ana",
                "admin",
                &["manage_products".into(), "view_reports".into()],
            )
            .unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user:abc");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.permissions, "manage_products,view_reports");
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = test_service();
        let token = svc
            .generate_token("user:abc", "a@b.c", "A", "user", &[])
            .unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(svc.validate_token(&tampered).is_err());
    }

    #[test]
    fn bearer_prefix_extraction() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
