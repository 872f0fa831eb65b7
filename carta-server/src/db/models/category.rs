//! Category registry model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use shared::models::{CategoryEntry, ProductKind};

use super::serde_helpers;

/// Singleton document (`category_registry:main`) holding both kind-scoped
/// category lists. Entries are addressed by surrogate id, never by array
/// position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRegistry {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub comidas: Vec<CategoryEntry>,
    #[serde(default)]
    pub bebidas: Vec<CategoryEntry>,
}

impl CategoryRegistry {
    pub fn list(&self, kind: ProductKind) -> &Vec<CategoryEntry> {
        match kind {
            ProductKind::Comidas => &self.comidas,
            ProductKind::Bebidas => &self.bebidas,
        }
    }

    pub fn list_mut(&mut self, kind: ProductKind) -> &mut Vec<CategoryEntry> {
        match kind {
            ProductKind::Comidas => &mut self.comidas,
            ProductKind::Bebidas => &mut self.bebidas,
        }
    }
}

/// Add category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryAdd {
    pub kind: ProductKind,
    #[validate(length(min = 1))]
    pub name: String,
}

/// Rename category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryRename {
    #[validate(length(min = 1))]
    pub name: String,
}
