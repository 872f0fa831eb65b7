//! Waiter model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use shared::models::{
    NoteKind, RatingCategories, ShiftStatus, TableStatus, WaiterNote, WaiterPerformance,
    WaiterRating, WaiterShift, WaiterTable,
};

use super::serde_helpers;

/// Waiter entity with embedded ratings, notes, shifts and tables.
///
/// Unlike products, `is_active` is required: waiter documents were always
/// written with it set explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waiter {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub photo: String,
    /// Identity document string
    pub dni: String,
    pub is_active: bool,
    #[serde(default)]
    pub ratings: Vec<WaiterRating>,
    #[serde(default)]
    pub notes: Vec<WaiterNote>,
    #[serde(default)]
    pub shifts: Vec<WaiterShift>,
    #[serde(default)]
    pub current_tables: Vec<WaiterTable>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub performance: WaiterPerformance,
    /// Derived: accumulated tips from ratings
    #[serde(default)]
    pub total_tips: Decimal,
    /// Derived: mean of `ratings[].rating`, 0.0 when empty
    #[serde(default)]
    pub average_rating: f64,
}

/// Create waiter payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WaiterCreate {
    #[validate(length(min = 1))]
    pub name: String,
    pub photo: Option<String>,
    #[validate(length(min = 1))]
    pub dni: String,
    pub is_active: Option<bool>,
}

/// Update waiter payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WaiterUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub photo: Option<String>,
    pub dni: Option<String>,
    pub is_active: Option<bool>,
    pub achievements: Option<Vec<String>>,
}

/// New waiter rating payload; id and date assigned server-side.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WaiterRatingCreate {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub comment: Option<String>,
    /// Required when settings.require_table_number is on
    #[validate(range(min = 1))]
    pub table_number: Option<u32>,
    /// Tip amount, >= 0 (checked in the handler; validator has no Decimal range)
    pub tip: Option<Decimal>,
    pub categories: RatingCategories,
    #[validate(length(min = 1))]
    pub customer_name: String,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl WaiterRatingCreate {
    pub fn into_rating(self) -> WaiterRating {
        WaiterRating {
            id: shared::util::snowflake_id(),
            user_id: self.user_id,
            rating: self.rating,
            comment: self.comment,
            table_number: self.table_number.unwrap_or(0),
            tip: self.tip.unwrap_or_default(),
            categories: self.categories,
            customer_name: self.customer_name,
            photos: self.photos,
            is_highlighted: false,
            likes: 0,
            date: chrono::Utc::now(),
        }
    }
}

/// New note payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NoteCreate {
    pub kind: NoteKind,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(length(min = 1))]
    pub created_by: String,
}

impl NoteCreate {
    pub fn into_note(self) -> WaiterNote {
        WaiterNote {
            id: shared::util::snowflake_id(),
            kind: self.kind,
            content: self.content,
            date: chrono::Utc::now(),
            created_by: self.created_by,
        }
    }
}

/// Update note payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NoteUpdate {
    pub kind: Option<NoteKind>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
}

/// New shift payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShiftCreate {
    pub date: NaiveDate,
    #[validate(length(min = 1))]
    pub start_time: String,
    #[validate(length(min = 1))]
    pub end_time: String,
}

impl ShiftCreate {
    pub fn into_shift(self) -> WaiterShift {
        WaiterShift {
            id: shared::util::snowflake_id(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            status: ShiftStatus::Scheduled,
        }
    }
}

/// Shift status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftStatusUpdate {
    pub status: ShiftStatus,
}

/// Open-table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TableOpen {
    #[validate(range(min = 1))]
    pub table_number: u32,
    #[validate(range(min = 1))]
    pub customer_count: u32,
}

impl TableOpen {
    pub fn into_table(self) -> WaiterTable {
        WaiterTable {
            id: shared::util::snowflake_id(),
            table_number: self.table_number,
            customer_count: self.customer_count,
            start_time: chrono::Utc::now(),
            end_time: None,
            status: TableStatus::Active,
            total_amount: Decimal::ZERO,
            tip_amount: Decimal::ZERO,
        }
    }
}

/// Close-table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableClose {
    pub total_amount: Decimal,
    pub tip_amount: Decimal,
}
