//! Waiter repository

use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use shared::models::{ShiftStatus, TableStatus, WaiterNote, WaiterRating, WaiterShift, WaiterTable};
use shared::{aggregate, keyed};

use super::{record_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{TableClose, Waiter, WaiterCreate, WaiterUpdate};

const TABLE: &str = "waiter";

#[derive(Clone)]
pub struct WaiterRepository {
    base: BaseRepository,
}

impl WaiterRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_active(&self) -> RepoResult<Vec<Waiter>> {
        let waiters: Vec<Waiter> = self
            .base
            .db()
            .query("SELECT * FROM waiter WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(waiters)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Waiter>> {
        let waiters: Vec<Waiter> = self
            .base
            .db()
            .query("SELECT * FROM waiter ORDER BY name")
            .await?
            .take(0)?;
        Ok(waiters)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Waiter>> {
        let rid = record_id(TABLE, id)?;
        let waiter: Option<Waiter> = self.base.db().select(rid).await?;
        Ok(waiter)
    }

    pub async fn create(&self, data: WaiterCreate) -> RepoResult<Waiter> {
        let waiter = Waiter {
            id: None,
            name: data.name,
            photo: data.photo.unwrap_or_default(),
            dni: data.dni,
            is_active: data.is_active.unwrap_or(true),
            ratings: Vec::new(),
            notes: Vec::new(),
            shifts: Vec::new(),
            current_tables: Vec::new(),
            achievements: Vec::new(),
            performance: Default::default(),
            total_tips: Default::default(),
            average_rating: 0.0,
        };

        let created: Option<Waiter> = self.base.db().create(TABLE).content(waiter).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create waiter".into()))
    }

    pub async fn update(&self, id: &str, data: WaiterUpdate) -> RepoResult<Waiter> {
        let rid = record_id(TABLE, id)?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.photo.is_some() {
            set_parts.push("photo = $photo");
        }
        if data.dni.is_some() {
            set_parts.push("dni = $dni");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }
        if data.achievements.is_some() {
            set_parts.push("achievements = $achievements");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Waiter {id} not found")));
        }

        let query_str = format!("UPDATE $record SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("record", rid));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.photo {
            query = query.bind(("photo", v));
        }
        if let Some(v) = data.dni {
            query = query.bind(("dni", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }
        if let Some(v) = data.achievements {
            query = query.bind(("achievements", v));
        }

        let waiters: Vec<Waiter> = query.await?.take(0)?;
        waiters
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Waiter {id} not found")))
    }

    /// Hard delete. Embedded shifts and tables go with the document; there
    /// is no cross-collection cascade to run.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = record_id(TABLE, id)?;
        let deleted: Option<Waiter> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Waiter {id} not found")));
        }
        Ok(())
    }

    // =========================================================================
    // Embedded array mutation
    // =========================================================================

    async fn load(&self, id: &str) -> RepoResult<Waiter> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Waiter {id} not found")))
    }

    async fn store_field<T>(&self, id: &str, field: &str, value: T) -> RepoResult<Waiter>
    where
        T: serde::Serialize + Send + Sync + 'static,
    {
        let rid = record_id(TABLE, id)?;
        let query_str = format!("UPDATE $record SET {field} = $value RETURN AFTER");
        let waiters: Vec<Waiter> = self
            .base
            .db()
            .query(query_str)
            .bind(("record", rid))
            .bind(("value", value))
            .await?
            .take(0)?;
        waiters
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Waiter {id} not found")))
    }

    /// Append a rating; average and tip total are recomputed and persisted
    /// together with the array in one document update.
    pub async fn add_rating(&self, id: &str, rating: WaiterRating) -> RepoResult<Waiter> {
        let mut waiter = self.load(id).await?;
        let total_tips = aggregate::accumulate_tips(waiter.total_tips, rating.tip);
        keyed::insert(&mut waiter.ratings, rating);
        let average = aggregate::average_rating(&waiter.ratings);

        let rid = record_id(TABLE, id)?;
        let waiters: Vec<Waiter> = self
            .base
            .db()
            .query(
                "UPDATE $record SET ratings = $ratings, average_rating = $average, \
                 total_tips = $total_tips RETURN AFTER",
            )
            .bind(("record", rid))
            .bind(("ratings", waiter.ratings))
            .bind(("average", average))
            .bind(("total_tips", total_tips))
            .await?
            .take(0)?;
        waiters
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Waiter {id} not found")))
    }

    pub async fn like_rating(&self, id: &str, rating_id: i64) -> RepoResult<Waiter> {
        let mut waiter = self.load(id).await?;
        if let Some(rating) = waiter.ratings.iter_mut().find(|r| r.id == rating_id) {
            rating.likes += 1;
        }
        self.store_field(id, "ratings", waiter.ratings).await
    }

    pub async fn toggle_highlight(&self, id: &str, rating_id: i64) -> RepoResult<Waiter> {
        let mut waiter = self.load(id).await?;
        if let Some(rating) = waiter.ratings.iter_mut().find(|r| r.id == rating_id) {
            rating.is_highlighted = !rating.is_highlighted;
        }
        self.store_field(id, "ratings", waiter.ratings).await
    }

    pub async fn add_note(&self, id: &str, note: WaiterNote) -> RepoResult<Waiter> {
        let mut waiter = self.load(id).await?;
        keyed::insert(&mut waiter.notes, note);
        self.store_field(id, "notes", waiter.notes).await
    }

    /// Replace the note whose id matches; unknown ids leave the array as-is.
    pub async fn update_note(&self, id: &str, note: WaiterNote) -> RepoResult<Waiter> {
        let mut waiter = self.load(id).await?;
        keyed::update(&mut waiter.notes, note);
        self.store_field(id, "notes", waiter.notes).await
    }

    pub async fn remove_note(&self, id: &str, note_id: i64) -> RepoResult<Waiter> {
        let mut waiter = self.load(id).await?;
        keyed::remove(&mut waiter.notes, note_id);
        self.store_field(id, "notes", waiter.notes).await
    }

    pub async fn add_shift(&self, id: &str, shift: WaiterShift) -> RepoResult<Waiter> {
        let mut waiter = self.load(id).await?;
        keyed::insert(&mut waiter.shifts, shift);
        self.store_field(id, "shifts", waiter.shifts).await
    }

    pub async fn update_shift_status(
        &self,
        id: &str,
        shift_id: i64,
        status: ShiftStatus,
    ) -> RepoResult<Waiter> {
        let mut waiter = self.load(id).await?;
        if let Some(shift) = waiter.shifts.iter_mut().find(|s| s.id == shift_id) {
            shift.status = status;
        }
        self.store_field(id, "shifts", waiter.shifts).await
    }

    pub async fn open_table(&self, id: &str, table: WaiterTable) -> RepoResult<Waiter> {
        let mut waiter = self.load(id).await?;
        keyed::insert(&mut waiter.current_tables, table);
        self.store_field(id, "current_tables", waiter.current_tables)
            .await
    }

    /// Close a table and recompute the performance counters from all
    /// completed tables, persisted together in one document update.
    pub async fn close_table(
        &self,
        id: &str,
        table_id: i64,
        close: TableClose,
    ) -> RepoResult<Waiter> {
        let mut waiter = self.load(id).await?;
        let Some(table) = waiter.current_tables.iter_mut().find(|t| t.id == table_id) else {
            return Err(RepoError::NotFound(format!(
                "Table {table_id} not found on waiter {id}"
            )));
        };
        table.status = TableStatus::Completed;
        table.end_time = Some(Utc::now());
        table.total_amount = close.total_amount;
        table.tip_amount = close.tip_amount;

        let performance = aggregate::performance(&waiter.current_tables);

        let rid = record_id(TABLE, id)?;
        let waiters: Vec<Waiter> = self
            .base
            .db()
            .query(
                "UPDATE $record SET current_tables = $tables, performance = $performance \
                 RETURN AFTER",
            )
            .bind(("record", rid))
            .bind(("tables", waiter.current_tables))
            .bind(("performance", performance))
            .await?
            .take(0)?;
        waiters
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Waiter {id} not found")))
    }
}
