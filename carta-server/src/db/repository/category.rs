//! Category registry repository
//!
//! The registry is one document holding both kind-scoped lists. Entries are
//! addressed by their surrogate id: deleting `id X` can never hit a
//! neighboring entry, regardless of how the list was reordered in between.

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use uuid::Uuid;

use shared::models::{CategoryEntry, ProductKind};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::CategoryRegistry;

const TABLE: &str = "category_registry";
const SINGLETON_KEY: &str = "main";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn singleton_id() -> RecordId {
        RecordId::from_table_key(TABLE, SINGLETON_KEY)
    }

    /// Load the registry, creating an empty one on first access.
    pub async fn get_or_create(&self) -> RepoResult<CategoryRegistry> {
        let existing: Option<CategoryRegistry> =
            self.base.db().select(Self::singleton_id()).await?;
        if let Some(registry) = existing {
            return Ok(registry);
        }

        let created: Option<CategoryRegistry> = self
            .base
            .db()
            .create((TABLE, SINGLETON_KEY))
            .content(CategoryRegistry::default())
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category registry".into()))
    }

    /// Persist one kind-scoped list back as a whole.
    async fn store_list(
        &self,
        kind: ProductKind,
        entries: Vec<CategoryEntry>,
    ) -> RepoResult<CategoryRegistry> {
        let field = match kind {
            ProductKind::Comidas => "comidas",
            ProductKind::Bebidas => "bebidas",
        };
        let query_str = format!("UPDATE $record SET {field} = $entries RETURN AFTER");
        let registries: Vec<CategoryRegistry> = self
            .base
            .db()
            .query(query_str)
            .bind(("record", Self::singleton_id()))
            .bind(("entries", entries))
            .await?
            .take(0)?;
        registries
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Category registry missing".into()))
    }

    /// Append a category. Duplicate names within a kind are rejected.
    pub async fn add(&self, kind: ProductKind, name: &str) -> RepoResult<CategoryRegistry> {
        let mut registry = self.get_or_create().await?;
        let list = registry.list_mut(kind);
        if list.iter().any(|entry| entry.name == name) {
            return Err(RepoError::Duplicate(format!(
                "Category '{name}' already exists in {kind}"
            )));
        }
        list.push(CategoryEntry::new(name));
        let list = list.clone();
        self.store_list(kind, list).await
    }

    /// Rename the entry with the given id and retarget products referencing
    /// the old name. The two writes are separate document updates; a crash
    /// in between leaves products pointing at the old name until retried.
    pub async fn rename(
        &self,
        kind: ProductKind,
        entry_id: Uuid,
        new_name: &str,
    ) -> RepoResult<CategoryRegistry> {
        let mut registry = self.get_or_create().await?;
        let list = registry.list_mut(kind);
        if list
            .iter()
            .any(|entry| entry.name == new_name && entry.id != entry_id)
        {
            return Err(RepoError::Duplicate(format!(
                "Category '{new_name}' already exists in {kind}"
            )));
        }
        let Some(entry) = list.iter_mut().find(|entry| entry.id == entry_id) else {
            return Err(RepoError::NotFound(format!("Category {entry_id} not found")));
        };
        let old_name = std::mem::replace(&mut entry.name, new_name.to_string());
        let list = list.clone();
        let updated = self.store_list(kind, list).await?;

        self.base
            .db()
            .query("UPDATE product SET category = $new WHERE kind = $kind AND category = $old")
            .bind(("new", new_name.to_string()))
            .bind(("old", old_name))
            .bind(("kind", kind))
            .await?
            .check()?;

        Ok(updated)
    }

    /// Remove exactly the entry with the given id. Products keep their
    /// category string; they show up as uncategorized until reassigned.
    pub async fn remove(&self, kind: ProductKind, entry_id: Uuid) -> RepoResult<CategoryRegistry> {
        let mut registry = self.get_or_create().await?;
        let list = registry.list_mut(kind);
        let before = list.len();
        list.retain(|entry| entry.id != entry_id);
        if list.len() == before {
            return Err(RepoError::NotFound(format!("Category {entry_id} not found")));
        }
        let list = list.clone();
        self.store_list(kind, list).await
    }
}
