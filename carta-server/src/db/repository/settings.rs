//! Settings repository

use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Settings, SettingsUpdate};

const TABLE: &str = "settings";
const SINGLETON_KEY: &str = "main";

#[derive(Clone)]
pub struct SettingsRepository {
    base: BaseRepository,
}

impl SettingsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn singleton_id() -> RecordId {
        RecordId::from_table_key(TABLE, SINGLETON_KEY)
    }

    pub async fn get_or_create(&self) -> RepoResult<Settings> {
        let existing: Option<Settings> = self.base.db().select(Self::singleton_id()).await?;
        if let Some(settings) = existing {
            return Ok(settings);
        }

        let created: Option<Settings> = self
            .base
            .db()
            .create((TABLE, SINGLETON_KEY))
            .content(Settings::default())
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create settings".into()))
    }

    /// Apply a partial update and stamp `updated_at`.
    pub async fn update(&self, data: SettingsUpdate) -> RepoResult<Settings> {
        // Ensure the singleton exists before updating it
        let mut settings = self.get_or_create().await?;

        if let Some(v) = data.restaurant_name {
            settings.restaurant_name = v;
        }
        if let Some(v) = data.enable_ratings {
            settings.enable_ratings = v;
        }
        if let Some(v) = data.enable_waiter_ratings {
            settings.enable_waiter_ratings = v;
        }
        if let Some(v) = data.require_table_number {
            settings.require_table_number = v;
        }
        if let Some(v) = data.dark_mode {
            settings.dark_mode = v;
        }
        settings.updated_at = Utc::now();

        let updated: Vec<Settings> = self
            .base
            .db()
            .query(
                "UPDATE $record SET restaurant_name = $restaurant_name, \
                 enable_ratings = $enable_ratings, \
                 enable_waiter_ratings = $enable_waiter_ratings, \
                 require_table_number = $require_table_number, \
                 dark_mode = $dark_mode, updated_at = $updated_at RETURN AFTER",
            )
            .bind(("record", Self::singleton_id()))
            .bind(("restaurant_name", settings.restaurant_name))
            .bind(("enable_ratings", settings.enable_ratings))
            .bind(("enable_waiter_ratings", settings.enable_waiter_ratings))
            .bind(("require_table_number", settings.require_table_number))
            .bind(("dark_mode", settings.dark_mode))
            .bind(("updated_at", settings.updated_at))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Settings singleton missing".into()))
    }
}
