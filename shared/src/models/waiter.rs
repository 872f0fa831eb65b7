//! Waiter sub-entity models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::keyed::Keyed;

/// Per-category sub-ratings of a waiter rating, each 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCategories {
    pub attention: i32,
    pub friendliness: i32,
    pub speed: i32,
    pub knowledge: i32,
}

/// Customer rating for a waiter, embedded in the waiter document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaiterRating {
    pub id: i64,
    pub user_id: String,
    /// 1..=5
    pub rating: i32,
    pub comment: Option<String>,
    pub table_number: u32,
    /// Tip amount, >= 0
    pub tip: Decimal,
    pub categories: RatingCategories,
    pub customer_name: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub is_highlighted: bool,
    #[serde(default)]
    pub likes: i64,
    pub date: DateTime<Utc>,
}

impl Keyed for WaiterRating {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Kind of an internal note about a waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteKind {
    #[serde(rename = "desempeño")]
    Desempeno,
    #[serde(rename = "incidente")]
    Incidente,
    #[serde(rename = "logro")]
    Logro,
    #[serde(rename = "entrenamiento")]
    Entrenamiento,
    #[serde(rename = "general")]
    General,
    #[serde(rename = "puntualidad")]
    Puntualidad,
}

/// Internal staff note, embedded in the waiter document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaiterNote {
    pub id: i64,
    pub kind: NoteKind,
    pub content: String,
    pub date: DateTime<Utc>,
    pub created_by: String,
}

impl Keyed for WaiterNote {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Shift lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShiftStatus {
    Scheduled,
    InProgress,
    Completed,
    Absent,
}

/// Scheduled or worked shift, embedded in the waiter document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaiterShift {
    pub id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: ShiftStatus,
}

impl Keyed for WaiterShift {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Table service status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Active,
    Completed,
}

/// Table currently or previously served, embedded in the waiter document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaiterTable {
    pub id: i64,
    pub table_number: u32,
    pub customer_count: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: TableStatus,
    pub total_amount: Decimal,
    pub tip_amount: Decimal,
}

impl Keyed for WaiterTable {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Derived service performance figures, recomputed when tables close.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaiterPerformance {
    #[serde(default)]
    pub tables_served: u32,
    #[serde(default)]
    pub total_sales: Decimal,
    #[serde(default)]
    pub customers_served: u32,
}
