//! Catalog flow against an in-memory database: product CRUD, variation
//! mutation, rating aggregates and the category registry.

use rust_decimal::Decimal;

use carta_server::db::models::{
    CategoryRegistry, ProductCreate, ProductRatingCreate, ProductUpdate, VariationCreate,
};
use carta_server::db::repository::{CategoryRepository, ProductRepository, RepoError};
use carta_server::db::DbService;
use shared::models::ProductKind;

async fn product_repo() -> ProductRepository {
    let db = DbService::memory().await.expect("in-memory db");
    ProductRepository::new(db.db)
}

fn paella() -> ProductCreate {
    ProductCreate {
        name: "Paella Valenciana".into(),
        description: Some("Arroz con pollo y verduras".into()),
        price: Decimal::from(18),
        image: None,
        category: "Arroces".into(),
        kind: ProductKind::Comidas,
        variations: vec![VariationCreate {
            name: "Media ración".into(),
            price: Decimal::from(10),
            tags: vec!["pequeña".into()],
        }],
    }
}

fn rating(user: &str, stars: i32) -> ProductRatingCreate {
    ProductRatingCreate {
        user_id: format!("user:{user}"),
        rating: stars,
        comment: None,
        user_name: user.to_string(),
    }
}

#[tokio::test]
async fn product_crud_round_trip() {
    let repo = product_repo().await;

    let created = repo.create(paella()).await.unwrap();
    let id = created.id.as_ref().unwrap().to_string();
    assert!(created.is_active);
    assert_eq!(created.variations.len(), 1);
    assert_eq!(created.average_rating, 0.0);

    let updated = repo
        .update(
            &id,
            ProductUpdate {
                name: None,
                description: None,
                price: Some(Decimal::from(20)),
                image: None,
                category: None,
                kind: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, Decimal::from(20));
    assert!(!updated.is_active);
    // Untouched fields survive a partial update
    assert_eq!(updated.name, "Paella Valenciana");

    assert!(repo.find_active().await.unwrap().is_empty());
    assert_eq!(repo.find_all().await.unwrap().len(), 1);

    repo.delete(&id).await.unwrap();
    assert!(repo.find_by_id(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn variation_insert_gets_fresh_id() {
    let repo = product_repo().await;
    let created = repo.create(paella()).await.unwrap();
    let id = created.id.as_ref().unwrap().to_string();
    let first_id = created.variations[0].id;

    let after = repo
        .add_variation(
            &id,
            VariationCreate {
                name: "Ración completa".into(),
                price: Decimal::from(18),
                tags: vec![],
            }
            .into_variation(),
        )
        .await
        .unwrap();

    assert_eq!(after.variations.len(), 2);
    assert_ne!(after.variations[1].id, first_id);

    let removed = repo.remove_variation(&id, first_id).await.unwrap();
    assert_eq!(removed.variations.len(), 1);
    assert_eq!(removed.variations[0].name, "Ración completa");
}

#[tokio::test]
async fn rating_average_includes_every_rating() {
    let repo = product_repo().await;
    let created = repo.create(paella()).await.unwrap();
    let id = created.id.as_ref().unwrap().to_string();

    let after_first = repo
        .add_rating(&id, rating("ana", 4).into_rating())
        .await
        .unwrap();
    assert_eq!(after_first.average_rating, 4.0);

    let after_second = repo
        .add_rating(&id, rating("ben", 2).into_rating())
        .await
        .unwrap();
    assert_eq!(after_second.ratings.len(), 2);
    assert_eq!(after_second.average_rating, 3.0);
}

#[tokio::test]
async fn blank_id_is_rejected_before_any_write() {
    let repo = product_repo().await;
    let err = repo.find_by_id("   ").await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn stale_whole_array_write_wins_intact() {
    let db = DbService::memory().await.expect("in-memory db");
    let repo = ProductRepository::new(db.db.clone());
    let created = repo.create(paella()).await.unwrap();
    let id = created.id.as_ref().unwrap().to_string();

    // Two writers start from the same snapshot
    let mut writer_a = created.variations.clone();
    let mut writer_b = created.variations.clone();
    writer_a.push(
        VariationCreate {
            name: "Para dos".into(),
            price: Decimal::from(32),
            tags: vec![],
        }
        .into_variation(),
    );
    writer_b.push(
        VariationCreate {
            name: "Tapa".into(),
            price: Decimal::from(6),
            tags: vec![],
        }
        .into_variation(),
    );

    for variations in [writer_a, writer_b.clone()] {
        db.db
            .query("UPDATE product SET variations = $variations WHERE id = type::thing('product', $key)")
            .bind(("variations", variations))
            .bind(("key", id.strip_prefix("product:").unwrap().to_string()))
            .await
            .unwrap()
            .check()
            .unwrap();
    }

    // The later writer's array survives as a unit; the earlier delta is gone
    let stored = repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.variations, writer_b);
    assert!(stored.variations.iter().all(|v| v.name != "Para dos"));
}

#[tokio::test]
async fn category_rename_retargets_products_by_surrogate_id() {
    let db = DbService::memory().await.expect("in-memory db");
    let products = ProductRepository::new(db.db.clone());
    let categories = CategoryRepository::new(db.db.clone());

    let registry: CategoryRegistry = categories.add(ProductKind::Comidas, "Arroces").await.unwrap();
    let entry_id = registry.comidas[0].id;
    let created = products.create(paella()).await.unwrap();

    let renamed = categories
        .rename(ProductKind::Comidas, entry_id, "Arroces y Fideuás")
        .await
        .unwrap();
    assert_eq!(renamed.comidas[0].name, "Arroces y Fideuás");
    // Surrogate id is stable across the rename
    assert_eq!(renamed.comidas[0].id, entry_id);

    let product_id = created.id.as_ref().unwrap().to_string();
    let product = products.find_by_id(&product_id).await.unwrap().unwrap();
    assert_eq!(product.category, "Arroces y Fideuás");
}

#[tokio::test]
async fn category_delete_hits_exactly_the_addressed_entry() {
    let db = DbService::memory().await.expect("in-memory db");
    let categories = CategoryRepository::new(db.db);

    categories.add(ProductKind::Comidas, "Arroces").await.unwrap();
    categories.add(ProductKind::Comidas, "Carnes").await.unwrap();
    let registry = categories.add(ProductKind::Comidas, "Postres").await.unwrap();

    // Delete the middle entry by id, as if the list had been reordered
    let carnes_id = registry.comidas[1].id;
    let after = categories
        .remove(ProductKind::Comidas, carnes_id)
        .await
        .unwrap();

    let names: Vec<&str> = after.comidas.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Arroces", "Postres"]);

    // Deleting it again is NotFound, not a silent neighbor hit
    let err = categories
        .remove(ProductKind::Comidas, carnes_id)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_category_names_are_rejected_per_kind() {
    let db = DbService::memory().await.expect("in-memory db");
    let categories = CategoryRepository::new(db.db);

    categories.add(ProductKind::Comidas, "Arroces").await.unwrap();
    let err = categories
        .add(ProductKind::Comidas, "Arroces")
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // Same name under the other kind is a different namespace
    assert!(categories.add(ProductKind::Bebidas, "Arroces").await.is_ok());
}
