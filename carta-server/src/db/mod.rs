//! Database module
//!
//! Embedded SurrealDB instance and the repository layer on top of it.

pub mod models;
pub mod repository;

use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;

use crate::utils::AppError;

const NAMESPACE: &str = "carta";
const DATABASE: &str = "carta";

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::init(db).await
    }

    /// In-memory database, used by tests.
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory db: {e}")))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        // Uniqueness the application relies on
        db.query("DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE")
            .await
            .map_err(|e| AppError::database(format!("Failed to define indexes: {e}")))?;

        tracing::info!("Database ready");
        Ok(Self { db })
    }
}
