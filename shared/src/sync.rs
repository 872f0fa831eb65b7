//! Sync messages pushed from the server to subscribed views.

use serde::{Deserialize, Serialize};

/// What happened to the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Created,
    Updated,
    Deleted,
}

/// One change notification.
///
/// `version` increases monotonically per resource type, letting a client
/// discard a stale snapshot that arrives after a newer one (its own
/// optimistic copy included).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncEvent {
    /// Resource type ("product", "waiter", "category", ...)
    pub resource: String,
    pub version: u64,
    pub action: SyncAction,
    /// Record id of the affected entity
    pub id: String,
    /// Whole-entity snapshot; `None` for deletions
    pub data: Option<serde_json::Value>,
}

impl SyncEvent {
    pub fn new(
        resource: impl Into<String>,
        version: u64,
        action: SyncAction,
        id: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            resource: resource.into(),
            version,
            action,
            id: id.into(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_round_trips_through_json() {
        let event = SyncEvent::new(
            "product",
            3,
            SyncAction::Updated,
            "product:abc",
            Some(serde_json::json!({ "name": "Paella" })),
        );
        let text = serde_json::to_string(&event).unwrap();
        let back: SyncEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(back.resource, "product");
        assert_eq!(back.version, 3);
        assert_eq!(back.action, SyncAction::Updated);
    }

    #[test]
    fn deletion_carries_no_data() {
        let event = SyncEvent::new("waiter", 1, SyncAction::Deleted, "waiter:x", None);
        assert!(event.data.is_none());
    }
}
