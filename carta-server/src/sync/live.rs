//! Live view reconciliation
//!
//! A [`LiveView`] mirrors one collection on the client side of the bus. On
//! every event it replaces the affected entity wholesale with the server's
//! snapshot; there is no field-level merging. Events carry per-resource
//! versions, so a snapshot that arrives out of order (an optimistic local
//! copy included) is discarded instead of resurrecting stale state. In
//! particular a deletion always beats a cached copy of the deleted entity.

use std::collections::BTreeMap;

use serde_json::Value;

use shared::{SyncAction, SyncEvent};

#[derive(Debug)]
pub struct LiveView {
    resource: String,
    /// Highest version applied so far
    version: u64,
    /// Entity id -> latest whole-entity snapshot
    items: BTreeMap<String, Value>,
    /// Ids deleted at or below `version`; kept so a late upsert of a
    /// deleted entity is recognized as stale
    tombstones: BTreeMap<String, u64>,
}

impl LiveView {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            version: 0,
            items: BTreeMap::new(),
            tombstones: BTreeMap::new(),
        }
    }

    /// Seed the view from an initial full snapshot (e.g. the first list
    /// response), keyed by entity id.
    pub fn seed(&mut self, items: impl IntoIterator<Item = (String, Value)>) {
        self.items = items.into_iter().collect();
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Current snapshot of all entities.
    pub fn snapshot(&self) -> Vec<Value> {
        self.items.values().cloned().collect()
    }

    /// Apply one event. Returns `true` when the view changed.
    pub fn apply(&mut self, event: &SyncEvent) -> bool {
        if event.resource != self.resource {
            return false;
        }
        // Stale push: a newer version already landed
        if event.version <= self.version && self.version != 0 {
            return false;
        }
        self.version = event.version;

        match event.action {
            SyncAction::Created | SyncAction::Updated => {
                if let Some(deleted_at) = self.tombstones.get(&event.id) {
                    if *deleted_at >= event.version {
                        return false;
                    }
                    self.tombstones.remove(&event.id);
                }
                match &event.data {
                    Some(data) => {
                        self.items.insert(event.id.clone(), data.clone());
                        true
                    }
                    None => false,
                }
            }
            SyncAction::Deleted => {
                self.tombstones.insert(event.id.clone(), event.version);
                self.items.remove(&event.id).is_some()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upsert(version: u64, id: &str, name: &str) -> SyncEvent {
        SyncEvent::new(
            "product",
            version,
            SyncAction::Updated,
            id,
            Some(json!({ "id": id, "name": name })),
        )
    }

    fn delete(version: u64, id: &str) -> SyncEvent {
        SyncEvent::new("product", version, SyncAction::Deleted, id, None)
    }

    #[test]
    fn upserts_replace_wholesale() {
        let mut view = LiveView::new("product");
        view.apply(&upsert(1, "product:a", "Paella"));
        view.apply(&upsert(2, "product:a", "Paella Mixta"));
        assert_eq!(view.len(), 1);
        assert_eq!(view.get("product:a").unwrap()["name"], "Paella Mixta");
    }

    #[test]
    fn deletion_removes_from_next_snapshot() {
        let mut view = LiveView::new("product");
        view.apply(&upsert(1, "product:a", "Paella"));
        view.apply(&delete(2, "product:a"));
        assert!(view.snapshot().is_empty());
    }

    #[test]
    fn deletion_beats_cached_optimistic_copy() {
        let mut view = LiveView::new("product");
        view.apply(&upsert(1, "product:a", "Paella"));
        view.apply(&delete(3, "product:a"));
        // A stale optimistic snapshot of the deleted entity arrives late
        assert!(!view.apply(&upsert(2, "product:a", "Paella (local)")));
        assert!(!view.contains("product:a"));
    }

    #[test]
    fn events_for_other_resources_are_ignored() {
        let mut view = LiveView::new("product");
        let foreign = SyncEvent::new("waiter", 1, SyncAction::Created, "waiter:x", Some(json!({})));
        assert!(!view.apply(&foreign));
        assert!(view.is_empty());
    }
}
