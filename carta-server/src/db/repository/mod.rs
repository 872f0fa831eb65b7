//! Repository module
//!
//! CRUD plus embedded-array mutation over SurrealDB documents.
//!
//! # ID convention
//!
//! The whole stack uses the "table:id" string format. Repositories accept
//! either the full form or the bare key and normalize before building a
//! `RecordId`.
//!
//! # Concurrency model
//!
//! Sub-entity arrays (variations, ratings, notes, shifts, tables) are
//! mutated read-modify-write: the parent is loaded, the array is changed in
//! memory, and the whole array is written back in a single document update.
//! Two clients racing on the same array lose one side's delta; last write
//! wins at whole-array granularity. There is no merge and no optimistic
//! lock; this is the documented tradeoff for a low-contention admin tool.

mod category;
mod product;
mod settings;
mod user;
mod waiter;

pub use category::CategoryRepository;
pub use product::ProductRepository;
pub use settings::SettingsRepository;
pub use user::UserRepository;
pub use waiter::WaiterRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        use crate::utils::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Reject blank ids before any write is attempted. Blank parent ids have
/// produced writes against nonexistent records in the past; fail fast.
pub fn ensure_id(id: &str) -> RepoResult<&str> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(RepoError::Validation("record id must not be blank".into()));
    }
    Ok(trimmed)
}

/// Build a `RecordId`, accepting both "table:key" and bare "key" forms.
pub fn record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let id = ensure_id(id)?;
    let key = id.strip_prefix(&format!("{table}:")).unwrap_or(id);
    Ok(RecordId::from_table_key(table, key))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_rejected() {
        assert!(ensure_id("").is_err());
        assert!(ensure_id("   ").is_err());
        assert_eq!(ensure_id(" product:x ").unwrap(), "product:x");
    }

    #[test]
    fn record_id_accepts_both_forms() {
        let full = record_id("product", "product:abc").unwrap();
        let bare = record_id("product", "abc").unwrap();
        assert_eq!(full, bare);
    }
}
