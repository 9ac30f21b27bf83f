//! Uploaded image storage on the local filesystem.
//!
//! Stored paths are relative to the media root (`<folder>/<uuid>.<ext>`) so the same
//! string is persisted in the database and served under `/media`.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Accepted content types and the extension used on disk.
pub const IMAGE_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// One uploaded file as received from a multipart `file` field.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

fn extension_for_type(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    IMAGE_TYPES.iter().find(|(mime, _)| *mime == essence).map(|(_, ext)| *ext)
}

fn extension_for_name(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("jpg"),
        "png" => Some("png"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        _ => None,
    }
}

/// Extension to store `upload` under, or a validation error for non-images and oversize files.
///
/// A generic `application/octet-stream` type falls back to the file name.
pub fn image_extension(upload: &Upload, max_bytes: usize) -> Result<&'static str, ServiceError> {
    if upload.bytes.is_empty() {
        return Err(ServiceError::Validation("empty file".into()));
    }
    if upload.bytes.len() > max_bytes {
        return Err(ServiceError::Validation(format!("file too large, maximum size is {} bytes", max_bytes)));
    }
    let by_type = match upload.content_type.as_deref() {
        Some(ct) if !ct.starts_with("application/octet-stream") => Some(extension_for_type(ct)),
        _ => None,
    };
    let ext = match by_type {
        Some(ext) => ext,
        None => upload.file_name.as_deref().and_then(extension_for_name),
    };
    ext.ok_or_else(|| ServiceError::Validation("unsupported image type, use jpeg, png, gif or webp".into()))
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Write `bytes` under `folder` with a fresh name; returns the relative path.
    async fn save(&self, folder: &str, extension: &str, bytes: &[u8]) -> Result<String, ServiceError>;
    /// Remove a stored file; `false` when nothing was there.
    async fn remove(&self, path: &str) -> Result<bool, ServiceError>;
    fn max_upload_bytes(&self) -> usize;
}

pub struct LocalMediaStore {
    root: PathBuf,
    max_upload_bytes: usize,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, max_upload_bytes: usize) -> Self {
        Self { root: root.into(), max_upload_bytes }
    }

    pub fn from_settings(cfg: &configs::MediaConfig) -> Self {
        Self::new(&cfg.root, cfg.max_upload_bytes)
    }

    pub fn root(&self) -> &Path { &self.root }

    /// Absolute location of a relative media path; rejects traversal.
    fn resolve(&self, relative: &str) -> Result<PathBuf, ServiceError> {
        let rel = Path::new(relative);
        let clean = !relative.is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !clean {
            return Err(ServiceError::Storage(format!("invalid media path: {}", relative)));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save(&self, folder: &str, extension: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        let relative = format!("{}/{}.{}", folder.trim_matches('/'), Uuid::new_v4().simple(), extension);
        let target = self.resolve(&relative)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Storage(format!("failed to create directory: {}", e)))?;
        }
        fs::write(&target, bytes)
            .await
            .map_err(|e| ServiceError::Storage(format!("failed to write file: {}", e)))?;
        info!(path = %relative, size = bytes.len(), "media_saved");
        Ok(relative)
    }

    async fn remove(&self, path: &str) -> Result<bool, ServiceError> {
        let target = self.resolve(path)?;
        match fs::remove_file(&target).await {
            Ok(()) => {
                info!(path = %path, "media_removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ServiceError::Storage(format!("failed to remove file: {}", e))),
        }
    }

    fn max_upload_bytes(&self) -> usize { self.max_upload_bytes }
}

/// Validate and store an image under `folder`.
pub async fn store_image(store: &dyn MediaStore, folder: &str, upload: &Upload) -> Result<String, ServiceError> {
    let ext = image_extension(upload, store.max_upload_bytes())?;
    store.save(folder, ext, &upload.bytes).await
}

/// Best-effort removal used after the database no longer references a file.
pub async fn discard(store: &Arc<dyn MediaStore>, path: Option<&str>) {
    let Some(path) = path else { return };
    if let Err(e) = store.remove(path).await {
        warn!(path = %path, error = %e, "media_remove_failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;

    fn png(bytes: usize) -> Upload {
        Upload { file_name: Some("pic.png".into()), content_type: Some("image/png".into()), bytes: vec![7u8; bytes] }
    }

    #[test]
    fn accepts_known_image_types() {
        assert_eq!(image_extension(&png(10), 100).unwrap(), "png");
        let jpeg = Upload { file_name: None, content_type: Some("image/JPEG; charset=binary".into()), bytes: vec![1] };
        assert_eq!(image_extension(&jpeg, 100).unwrap(), "jpg");
    }

    #[test]
    fn octet_stream_falls_back_to_file_name() {
        let up = Upload { file_name: Some("photo.JPEG".into()), content_type: Some("application/octet-stream".into()), bytes: vec![1] };
        assert_eq!(image_extension(&up, 100).unwrap(), "jpg");
    }

    #[test]
    fn rejects_non_images_empty_and_oversize() {
        let txt = Upload { file_name: Some("notes.txt".into()), content_type: Some("text/plain".into()), bytes: vec![1] };
        assert!(matches!(image_extension(&txt, 100), Err(ServiceError::Validation(_))));
        // declared type wins over a misleading name
        let svg = Upload { file_name: Some("x.png".into()), content_type: Some("image/svg+xml".into()), bytes: vec![1] };
        assert!(image_extension(&svg, 100).is_err());
        assert!(image_extension(&png(0), 100).is_err());
        assert!(image_extension(&png(101), 100).is_err());
        assert!(image_extension(&png(100), 100).is_ok());
    }

    #[tokio::test]
    async fn save_then_remove() {
        let root = scratch_dir("media");
        let store = LocalMediaStore::new(&root, 1024);
        let path = store_image(&store, "guides/3", &png(16)).await.unwrap();
        assert!(path.starts_with("guides/3/"));
        assert!(path.ends_with(".png"));
        assert_eq!(std::fs::read(root.join(&path)).unwrap().len(), 16);

        assert!(store.remove(&path).await.unwrap());
        assert!(!store.remove(&path).await.unwrap());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let store = LocalMediaStore::new(scratch_dir("media"), 1024);
        assert!(matches!(store.remove("../etc/passwd").await, Err(ServiceError::Storage(_))));
        assert!(matches!(store.remove("/etc/passwd").await, Err(ServiceError::Storage(_))));
        assert!(store.save("../outside", "png", b"x").await.is_err());
    }
}
