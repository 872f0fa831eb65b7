//! Catalog export and import
//!
//! The export is a ZIP holding `catalog.json` (full fidelity), two CSV
//! views for spreadsheet use, and every stored image. Import is the
//! inverse: it replaces the catalog wholesale, remapping record ids.

use std::io::{Cursor, Read, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use shared::models::{ProductKind, ProductRating};
use shared::{aggregate, normalize};

use crate::db::models::{CategoryRegistry, Product};
use crate::db::repository::{CategoryRepository, ProductRepository};
use crate::utils::AppError;

/// Products travel as raw JSON so archives from older exporters (or edited
/// by hand) still import; fields are normalized on the way in.
#[derive(Serialize, Deserialize)]
struct CatalogExport {
    pub version: u32,
    pub exported_at: i64,
    pub categories: CategoryRegistry,
    pub products: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub products: usize,
    pub categories: usize,
    pub images: usize,
}

#[derive(Clone)]
pub struct CatalogExporter {
    db: Surreal<Db>,
    images_dir: PathBuf,
}

impl CatalogExporter {
    pub fn new(db: Surreal<Db>, images_dir: PathBuf) -> Self {
        Self { db, images_dir }
    }

    /// Build the export ZIP in memory.
    pub async fn export_zip(&self) -> Result<Vec<u8>, AppError> {
        let products = ProductRepository::new(self.db.clone()).find_all().await?;
        let categories = CategoryRepository::new(self.db.clone())
            .get_or_create()
            .await?;

        let menu_csv = menu_csv(&products);
        let categories_csv = categories_csv(&categories, &products);

        let catalog = CatalogExport {
            version: 1,
            exported_at: shared::util::now_millis(),
            categories,
            products: products
                .into_iter()
                .map(|p| serde_json::to_value(p).unwrap_or(Value::Null))
                .collect(),
        };
        let catalog_json =
            serde_json::to_vec_pretty(&catalog).map_err(|e| AppError::internal(e.to_string()))?;

        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buf);
            let options: FileOptions<()> =
                FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            for (name, data) in [
                ("catalog.json", catalog_json.as_slice()),
                ("menu.csv", menu_csv.as_bytes()),
                ("categories.csv", categories_csv.as_bytes()),
            ] {
                zip.start_file(name, options)
                    .map_err(|e| AppError::internal(e.to_string()))?;
                zip.write_all(data)
                    .map_err(|e| AppError::internal(e.to_string()))?;
            }

            if let Ok(entries) = std::fs::read_dir(&self.images_dir) {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if !path.is_file() {
                        continue;
                    }
                    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                        continue;
                    };
                    zip.start_file(format!("images/{name}"), options)
                        .map_err(|e| AppError::internal(e.to_string()))?;
                    let data =
                        std::fs::read(&path).map_err(|e| AppError::internal(e.to_string()))?;
                    zip.write_all(&data)
                        .map_err(|e| AppError::internal(e.to_string()))?;
                }
            }

            zip.finish()
                .map_err(|e| AppError::internal(e.to_string()))?;
        }

        Ok(buf.into_inner())
    }

    /// Replace the catalog from an export ZIP. Products get fresh record
    /// ids; category entries keep the ids from the archive so product
    /// category strings still line up with registry entries.
    pub async fn import_zip(&self, zip_bytes: &[u8]) -> Result<ImportSummary, AppError> {
        let cursor = Cursor::new(zip_bytes);
        let mut archive = ZipArchive::new(cursor)
            .map_err(|e| AppError::validation(format!("Invalid ZIP: {e}")))?;

        let catalog: CatalogExport = {
            let mut file = archive
                .by_name("catalog.json")
                .map_err(|_| AppError::validation("ZIP missing catalog.json"))?;
            let mut json_bytes = Vec::new();
            file.read_to_end(&mut json_bytes)
                .map_err(|e| AppError::internal(e.to_string()))?;
            serde_json::from_slice(&json_bytes)
                .map_err(|e| AppError::validation(format!("Invalid catalog.json: {e}")))?
        };

        let mut images = 0usize;
        std::fs::create_dir_all(&self.images_dir)
            .map_err(|e| AppError::internal(e.to_string()))?;
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| AppError::internal(e.to_string()))?;
            let name = file.name().to_string();
            let Some(image_name) = name.strip_prefix("images/") else {
                continue;
            };
            if image_name.is_empty() || image_name.contains("..") || image_name.contains('/') {
                continue;
            }
            let mut data = Vec::new();
            file.read_to_end(&mut data)
                .map_err(|e| AppError::internal(e.to_string()))?;
            std::fs::write(self.images_dir.join(image_name), &data)
                .map_err(|e| AppError::internal(e.to_string()))?;
            images += 1;
        }

        // Replace products wholesale, remapping ids
        self.db
            .query("DELETE product")
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .check()
            .map_err(|e| AppError::database(e.to_string()))?;
        let mut imported = 0usize;
        for raw in &catalog.products {
            let Some(product) = product_from_raw(raw) else {
                tracing::warn!("Skipping malformed product document in import");
                continue;
            };
            let created: Option<Product> = self
                .db
                .create("product")
                .content(product)
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            if created.is_some() {
                imported += 1;
            }
        }

        // Replace both registry lists
        let category_count = catalog.categories.comidas.len() + catalog.categories.bebidas.len();
        CategoryRepository::new(self.db.clone()).get_or_create().await?;
        self.db
            .query("UPDATE category_registry:main SET comidas = $comidas, bebidas = $bebidas")
            .bind(("comidas", catalog.categories.comidas))
            .bind(("bebidas", catalog.categories.bebidas))
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .check()
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok(ImportSummary {
            products: imported,
            categories: category_count,
            images,
        })
    }
}

/// Build a typed product from a raw archive document.
///
/// Name, category and kind are required; everything else is normalized
/// with permissive defaults so a half-broken legacy document imports
/// instead of aborting the whole archive. The stored average is always
/// recomputed from the ratings that actually made it in.
fn product_from_raw(doc: &Value) -> Option<Product> {
    let name = doc.get("name")?.as_str()?.to_string();
    let category = doc.get("category")?.as_str()?.to_string();
    let kind: ProductKind = serde_json::from_value(doc.get("kind")?.clone()).ok()?;

    let ratings: Vec<ProductRating> = doc
        .get("ratings")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    Some(Product {
        id: None,
        name,
        description: doc
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        price: doc
            .get("price")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default(),
        image: doc
            .get("image")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        category,
        kind,
        is_active: normalize::is_active(doc),
        variations: normalize::variations(doc),
        average_rating: aggregate::average_rating(&ratings),
        ratings,
    })
}

/// One row per product, then one per variation.
fn menu_csv(products: &[Product]) -> String {
    let mut out = String::from("row,kind,category,product,variation,price,active\n");
    for product in products {
        out.push_str(&format!(
            "product,{},{},{},,{},{}\n",
            product.kind,
            csv_field(&product.category),
            csv_field(&product.name),
            product.price,
            product.is_active
        ));
        for variation in &product.variations {
            out.push_str(&format!(
                "variation,{},{},{},{},{},{}\n",
                product.kind,
                csv_field(&product.category),
                csv_field(&product.name),
                csv_field(&variation.name),
                variation.price,
                product.is_active
            ));
        }
    }
    out
}

/// Per-category roll-up: product count and average base price.
fn categories_csv(registry: &CategoryRegistry, products: &[Product]) -> String {
    let mut out = String::from("kind,category,products,average_price\n");
    for (kind, entries) in [
        (ProductKind::Comidas, &registry.comidas),
        (ProductKind::Bebidas, &registry.bebidas),
    ] {
        for entry in entries {
            let matching: Vec<_> = products
                .iter()
                .filter(|p| p.kind == kind && p.category == entry.name)
                .collect();
            let average = if matching.is_empty() {
                rust_decimal::Decimal::ZERO
            } else {
                matching.iter().map(|p| p.price).sum::<rust_decimal::Decimal>()
                    / rust_decimal::Decimal::from(matching.len())
            };
            out.push_str(&format!(
                "{},{},{},{}\n",
                kind,
                csv_field(&entry.name),
                matching.len(),
                average.round_dp(2)
            ));
        }
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(name: &str, category: &str, price: i64) -> Product {
        Product {
            id: None,
            name: name.to_string(),
            description: String::new(),
            price: Decimal::from(price),
            image: String::new(),
            category: category.to_string(),
            kind: ProductKind::Comidas,
            is_active: true,
            variations: Vec::new(),
            ratings: Vec::new(),
            average_rating: 0.0,
        }
    }

    #[test]
    fn menu_csv_has_one_row_per_product_and_variation() {
        let mut paella = product("Paella", "Arroces", 18);
        paella.variations.push(shared::models::Variation {
            id: 1,
            name: "Media".into(),
            price: Decimal::from(10),
            tags: Vec::new(),
        });
        let csv = menu_csv(&[paella]);
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains("variation,COMIDAS,Arroces,Paella,Media,10,true"));
    }

    #[test]
    fn csv_fields_with_commas_are_quoted() {
        assert_eq!(csv_field("Café, solo"), "\"Café, solo\"");
        assert_eq!(csv_field("Paella"), "Paella");
    }

    #[test]
    fn raw_import_normalizes_legacy_documents() {
        let doc = serde_json::json!({
            "name": "Tortilla",
            "category": "Tapas",
            "kind": "COMIDAS",
            "price": 6.5,
            "variations": [ { "name": "Pincho", "price": 2 } ],
            "ratings": [],
        });
        let product = product_from_raw(&doc).unwrap();
        // Absent is_active means active; the id-less variation is repaired
        assert!(product.is_active);
        assert_eq!(product.variations.len(), 1);
        assert!(product.variations[0].id > 0);
        assert_eq!(product.average_rating, 0.0);

        assert!(product_from_raw(&serde_json::json!({ "name": "sin categoría" })).is_none());
    }

    #[test]
    fn raw_import_recomputes_average_from_ratings() {
        let doc = serde_json::json!({
            "name": "Sangría",
            "category": "Jarras",
            "kind": "BEBIDAS",
            "price": 12,
            "average_rating": 5.0,
            "ratings": [
                { "id": 1, "user_id": "user:a", "rating": 4, "comment": null,
                  "date": "2026-01-15T12:00:00Z", "user_name": "Ana" },
                { "id": 2, "user_id": "user:b", "rating": 2, "comment": "aguada",
                  "date": "2026-01-16T12:00:00Z", "user_name": "Borja" },
            ],
        });
        let product = product_from_raw(&doc).unwrap();
        assert_eq!(product.ratings.len(), 2);
        // The stored average in the archive is ignored
        assert_eq!(product.average_rating, 3.0);
    }

    #[test]
    fn category_rollup_averages_base_prices() {
        let mut registry = CategoryRegistry::default();
        registry
            .comidas
            .push(shared::models::CategoryEntry::new("Arroces"));
        let products = [
            product("Paella", "Arroces", 18),
            product("Arroz negro", "Arroces", 20),
        ];
        let csv = categories_csv(&registry, &products);
        assert!(csv.contains("COMIDAS,Arroces,2,19"));
    }
}
