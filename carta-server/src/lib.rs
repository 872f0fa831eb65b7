//! Carta Server - digital restaurant menu & back-office
//!
//! # Overview
//!
//! A single embedded-database server behind two client surfaces:
//!
//! - **Public menu** (`api/menu`): active products, categories, waiters and
//!   customer ratings, no authentication
//! - **Back office** (`api/*`): JWT-authenticated administration of
//!   products, categories, waiters, users and settings
//! - **Live sync** (`sync`): broadcast bus pushing whole-entity snapshots
//!   to subscribed views and a TCP JSON-lines feed
//!
//! # Module structure
//!
//! ```text
//! carta-server/src/
//! ├── core/          # config, state, server lifecycle
//! ├── auth/          # JWT, permissions, middleware
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SurrealDB models and repositories
//! ├── services/      # image store, catalog export
//! ├── sync/          # change broadcast and live views
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod sync;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Load environment, create the working directory layout and start logging.
pub fn setup_environment() -> Result<(), AppError> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config
        .ensure_work_dir_structure()
        .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    if config.environment == "production" {
        init_logger_with_file(
            log_level.as_deref(),
            config.logs_dir().to_str(),
        );
    } else {
        init_logger_with_file(log_level.as_deref(), None);
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______           __
  / ____/___ ______/ /_____ _
 / /   / __ `/ ___/ __/ __ `/
/ /___/ /_/ / /  / /_/ /_/ /
\____/\__,_/_/   \__/\__,_/
    "#
    );
}
