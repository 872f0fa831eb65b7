//! End-to-end live sync: repository writes broadcast through the server
//! state and land in subscribed views.

use rust_decimal::Decimal;

use carta_server::db::models::ProductCreate;
use carta_server::db::repository::ProductRepository;
use carta_server::db::DbService;
use carta_server::sync::LiveView;
use carta_server::{Config, ServerState};
use shared::models::ProductKind;
use shared::SyncAction;

async fn test_state() -> ServerState {
    let db = DbService::memory().await.expect("in-memory db");
    ServerState::with_db(Config::from_env(), db.db)
}

fn gazpacho() -> ProductCreate {
    ProductCreate {
        name: "Gazpacho".into(),
        description: None,
        price: Decimal::from(7),
        image: None,
        category: "Entrantes".into(),
        kind: ProductKind::Comidas,
        variations: vec![],
    }
}

#[tokio::test]
async fn deleted_entity_leaves_the_next_snapshot() {
    let state = test_state().await;
    let repo = ProductRepository::new(state.db.clone());
    let mut subscription = state.sync_bus.subscribe();
    let mut view = LiveView::new("product");

    let product = repo.create(gazpacho()).await.unwrap();
    let id = product.id.as_ref().unwrap().to_string();
    state.broadcast_sync("product", SyncAction::Created, &id, Some(&product));

    view.apply(&subscription.recv().await.unwrap());
    assert!(view.contains(&id));

    repo.delete(&id).await.unwrap();
    state.broadcast_sync::<serde_json::Value>("product", SyncAction::Deleted, &id, None);

    view.apply(&subscription.recv().await.unwrap());
    assert!(!view.contains(&id));
    assert!(view.snapshot().is_empty());

    // A stale snapshot of the deleted product cannot resurrect it
    let stale = shared::SyncEvent::new(
        "product",
        1,
        SyncAction::Updated,
        &id,
        Some(serde_json::to_value(&product).unwrap()),
    );
    assert!(!view.apply(&stale));
    assert!(view.snapshot().is_empty());
}

#[tokio::test]
async fn versions_are_monotonic_per_resource() {
    let state = test_state().await;
    let mut subscription = state.sync_bus.subscribe();

    let value = serde_json::json!({ "name": "x" });
    state.broadcast_sync("product", SyncAction::Created, "product:a", Some(&value));
    state.broadcast_sync("waiter", SyncAction::Created, "waiter:a", Some(&value));
    state.broadcast_sync("product", SyncAction::Updated, "product:a", Some(&value));

    let first = subscription.recv().await.unwrap();
    let second = subscription.recv().await.unwrap();
    let third = subscription.recv().await.unwrap();

    assert_eq!((first.resource.as_str(), first.version), ("product", 1));
    assert_eq!((second.resource.as_str(), second.version), ("waiter", 1));
    assert_eq!((third.resource.as_str(), third.version), ("product", 2));
}

#[tokio::test]
async fn every_subscriber_sees_every_event() {
    let state = test_state().await;
    let mut a = state.sync_bus.subscribe();
    let mut b = state.sync_bus.subscribe();

    let value = serde_json::json!({ "name": "x" });
    state.broadcast_sync("settings", SyncAction::Updated, "settings:main", Some(&value));

    assert_eq!(a.recv().await.unwrap().id, "settings:main");
    assert_eq!(b.recv().await.unwrap().id, "settings:main");
}
