//! Image storage
//!
//! Uploaded images are validated, re-encoded as JPEG and stored under the
//! content hash, so uploading the same picture twice yields the same file.

use std::io::Cursor;
use std::path::PathBuf;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::utils::AppError;

/// Maximum upload size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Accepted source formats; everything is converted to JPEG on ingest
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for dish and staff photos
const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Serialize)]
pub struct StoredImage {
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub url: String,
    /// True when an identical image already existed
    pub deduplicated: bool,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    images_dir: PathBuf,
    public_base_url: String,
}

impl ImageStore {
    pub fn new(images_dir: PathBuf, public_base_url: String) -> Self {
        Self {
            images_dir,
            public_base_url,
        }
    }

    /// Validate, compress and persist an uploaded image.
    ///
    /// The stored filename is the SHA-256 of the compressed bytes, so a
    /// re-upload of the same image is detected without any index.
    pub async fn store(&self, data: Vec<u8>, original_name: &str) -> Result<StoredImage, AppError> {
        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::validation(format!(
                "File too large. Maximum size is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }

        let ext = PathBuf::from(original_name)
            .extension()
            .and_then(|e| e.to_str().map(|s| s.to_lowercase()))
            .ok_or_else(|| {
                AppError::validation(format!("Invalid file extension for: {original_name}"))
            })?;
        if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
            return Err(AppError::validation(format!(
                "Unsupported file format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            )));
        }

        let compressed = compress_to_jpeg(&data)?;
        let hash = {
            let mut hasher = Sha256::new();
            hasher.update(&compressed);
            hex::encode(hasher.finalize())
        };
        let filename = format!("{hash}.jpg");
        let path = self.images_dir.join(&filename);

        let deduplicated = path.exists();
        if !deduplicated {
            tokio::fs::create_dir_all(&self.images_dir)
                .await
                .map_err(|e| AppError::internal(format!("Failed to create images dir: {e}")))?;
            tokio::fs::write(&path, &compressed)
                .await
                .map_err(|e| AppError::internal(format!("Failed to save image: {e}")))?;
        } else {
            tracing::info!(original_name, %filename, "Duplicate image, reusing existing file");
        }

        Ok(StoredImage {
            url: self.url_for(&filename),
            filename,
            original_name: original_name.to_string(),
            size: compressed.len(),
            deduplicated,
        })
    }

    /// Read a stored image. Rejects path traversal attempts.
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>, AppError> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(AppError::validation("Invalid filename"));
        }
        tokio::fs::read(self.images_dir.join(filename))
            .await
            .map_err(|_| AppError::not_found(format!("Image {filename}")))
    }

    pub fn url_for(&self, filename: &str) -> String {
        format!(
            "{}/api/image/{}",
            self.public_base_url.trim_end_matches('/'),
            filename
        )
    }
}

fn compress_to_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| AppError::internal(format!("Failed to compress image: {e}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_pixel() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 40, 40]));
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[tokio::test]
    async fn same_bytes_store_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().to_path_buf(), "http://localhost:3000".into());

        let first = store.store(png_pixel(), "plato.png").await.unwrap();
        assert!(!first.deduplicated);
        let second = store.store(png_pixel(), "copia.png").await.unwrap();
        assert!(second.deduplicated);
        assert_eq!(first.filename, second.filename);
    }

    #[tokio::test]
    async fn rejects_traversal_and_unknown_formats() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().to_path_buf(), "http://localhost:3000".into());

        assert!(store.read("../secret").await.is_err());
        assert!(store.store(vec![1, 2, 3], "notes.txt").await.is_err());
    }
}
