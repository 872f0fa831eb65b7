//! Shared server utilities

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResponse};
pub use validation::validate;

/// Result alias used by all API handlers
pub type AppResult<T> = Result<T, AppError>;
