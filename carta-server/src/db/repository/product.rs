//! Product repository

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use shared::models::{ProductKind, ProductRating, Variation};
use shared::{aggregate, keyed};

use super::{record_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, ProductUpdate};

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All active products (public menu view)
    pub async fn find_active(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// All products including inactive (admin view)
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Active products of one kind
    pub async fn find_by_kind(&self, kind: ProductKind) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE kind = $kind AND is_active = true ORDER BY name")
            .bind(("kind", kind))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Active products within a category of one kind
    pub async fn find_by_category(
        &self,
        kind: ProductKind,
        category: &str,
    ) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE kind = $kind AND category = $category AND is_active = true ORDER BY name")
            .bind(("kind", kind))
            .bind(("category", category.to_string()))
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let rid = record_id(TABLE, id)?;
        let product: Option<Product> = self.base.db().select(rid).await?;
        Ok(product)
    }

    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let product = Product {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            price: data.price,
            image: data.image.unwrap_or_default(),
            category: data.category,
            kind: data.kind,
            is_active: true,
            variations: data
                .variations
                .into_iter()
                .map(|v| v.into_variation())
                .collect(),
            ratings: Vec::new(),
            average_rating: 0.0,
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".into()))
    }

    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let rid = record_id(TABLE, id)?;

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.image.is_some() {
            set_parts.push("image = $image");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.kind.is_some() {
            set_parts.push("kind = $kind");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")));
        }

        let query_str = format!("UPDATE $record SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("record", rid));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.image {
            query = query.bind(("image", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.kind {
            query = query.bind(("kind", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = record_id(TABLE, id)?;
        let deleted: Option<Product> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Product {id} not found")));
        }
        Ok(())
    }

    // =========================================================================
    // Embedded array mutation: whole-array replacement, one update per write
    // =========================================================================

    async fn load(&self, id: &str) -> RepoResult<Product> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
    }

    /// Persist the full variations array back onto the parent.
    async fn store_variations(&self, id: &str, variations: Vec<Variation>) -> RepoResult<Product> {
        let rid = record_id(TABLE, id)?;
        let products: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $record SET variations = $variations RETURN AFTER")
            .bind(("record", rid))
            .bind(("variations", variations))
            .await?
            .take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
    }

    pub async fn add_variation(&self, id: &str, variation: Variation) -> RepoResult<Product> {
        let mut product = self.load(id).await?;
        keyed::insert(&mut product.variations, variation);
        self.store_variations(id, product.variations).await
    }

    /// Replace the variation whose id matches. No matching id leaves the
    /// array unchanged.
    pub async fn update_variation(&self, id: &str, variation: Variation) -> RepoResult<Product> {
        let mut product = self.load(id).await?;
        keyed::update(&mut product.variations, variation);
        self.store_variations(id, product.variations).await
    }

    pub async fn remove_variation(&self, id: &str, variation_id: i64) -> RepoResult<Product> {
        let mut product = self.load(id).await?;
        keyed::remove(&mut product.variations, variation_id);
        self.store_variations(id, product.variations).await
    }

    /// Append a rating and recompute the average, both persisted in one
    /// document update.
    pub async fn add_rating(&self, id: &str, rating: ProductRating) -> RepoResult<Product> {
        let mut product = self.load(id).await?;
        keyed::insert(&mut product.ratings, rating);
        let average = aggregate::average_rating(&product.ratings);

        let rid = record_id(TABLE, id)?;
        let products: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $record SET ratings = $ratings, average_rating = $average RETURN AFTER")
            .bind(("record", rid))
            .bind(("ratings", product.ratings))
            .bind(("average", average))
            .await?
            .take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
    }
}
