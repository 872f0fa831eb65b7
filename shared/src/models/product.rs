//! Product sub-entity models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::keyed::Keyed;

/// Product kind, the two sections of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductKind {
    #[serde(rename = "COMIDAS")]
    Comidas,
    #[serde(rename = "BEBIDAS")]
    Bebidas,
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Comidas => write!(f, "COMIDAS"),
            Self::Bebidas => write!(f, "BEBIDAS"),
        }
    }
}

impl std::str::FromStr for ProductKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "COMIDAS" => Ok(Self::Comidas),
            "BEBIDAS" => Ok(Self::Bebidas),
            other => Err(format!("Unknown kind '{other}'")),
        }
    }
}

/// Product variation, embedded in the product document.
///
/// `id` is numeric and locally unique within the parent's array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Keyed for Variation {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Customer rating for a product, embedded in the product document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRating {
    pub id: i64,
    pub user_id: String,
    /// 1..=5
    pub rating: i32,
    pub comment: Option<String>,
    pub date: DateTime<Utc>,
    pub user_name: String,
}

impl Keyed for ProductRating {
    fn key(&self) -> i64 {
        self.id
    }
}
