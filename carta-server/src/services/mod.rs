//! Background and support services

pub mod catalog_export;
pub mod image_store;

pub use catalog_export::CatalogExporter;
pub use image_store::{ImageStore, StoredImage};
