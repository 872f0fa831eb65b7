//! Settings model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

/// Singleton settings document (`settings:main`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub restaurant_name: String,
    pub enable_ratings: bool,
    pub enable_waiter_ratings: bool,
    pub require_table_number: bool,
    pub dark_mode: bool,
    pub updated_at: DateTime<Utc>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: None,
            restaurant_name: "Mi Restaurante".to_string(),
            enable_ratings: true,
            enable_waiter_ratings: true,
            require_table_number: false,
            dark_mode: false,
            updated_at: Utc::now(),
        }
    }
}

/// Update settings payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SettingsUpdate {
    #[validate(length(min = 1))]
    pub restaurant_name: Option<String>,
    pub enable_ratings: Option<bool>,
    pub enable_waiter_ratings: Option<bool>,
    pub require_table_number: Option<bool>,
    pub dark_mode: Option<bool>,
}
