use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/carta | working directory (database, images, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | SYNC_TCP_PORT | 8081 | TCP sync feed port |
/// | PUBLIC_BASE_URL | http://localhost:3000 | base for uploaded image URLs |
/// | ENVIRONMENT | development | development \| staging \| production |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/carta HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding database, images and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// TCP sync feed port (clients subscribe for change events)
    pub sync_tcp_port: u16,
    /// Base URL prefixed to uploaded image paths
    pub public_base_url: String,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/carta".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            sync_tcp_port: std::env::var("SYNC_TCP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8081),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn images_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("images")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the working directory layout if missing.
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.images_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
