//! Category registry entry

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One named category inside a kind-scoped list.
///
/// Entries carry a surrogate id assigned at creation so that rename and
/// delete address a stable identity. Array position is display order only
/// and never identifies an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: Uuid,
    pub name: String,
}

impl CategoryEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
