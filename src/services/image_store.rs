use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::fs;
use tracing::info;

pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub fn is_allowed_image_type(mimetype: &str) -> bool {
    let mimetype = mimetype.trim().to_ascii_lowercase();
    ALLOWED_IMAGE_TYPES.contains(&mimetype.as_str())
}

/// Replace everything outside `[a-zA-Z0-9.-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub filename: String,
    /// Public URL path, e.g. `/uploads/1700000000000_cat.png`.
    pub path: String,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<StoredImage, ImageStoreError>;

    /// Remove a previously stored image by its public path. `Ok(false)` when
    /// the path is not one of ours or the file is already gone.
    async fn delete(&self, public_path: &str) -> Result<bool, ImageStoreError>;
}

/// Flat directory of uploaded images, served under `public_prefix`.
pub struct LocalImageStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> Result<(), ImageStoreError> {
        fs::create_dir_all(&self.root).await?;
        info!("Image storage directory: {}", self.root.display());
        Ok(())
    }

    /// Map a public path back to a file inside the root. Only the final
    /// segment is used so a stored URL can never point outside the directory.
    fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let rest = public_path.strip_prefix(&self.public_prefix)?.strip_prefix('/')?;
        let name = rest.rsplit('/').next()?;
        if name.is_empty() || name == "." || name == ".." || name.contains('\\') {
            return None;
        }
        Some(self.root.join(name))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<StoredImage, ImageStoreError> {
        fs::create_dir_all(&self.root).await?;

        let filename = format!(
            "{}_{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(original_name)
        );
        fs::write(self.root.join(&filename), bytes).await?;

        Ok(StoredImage {
            path: format!("{}/{}", self.public_prefix, filename),
            filename,
        })
    }

    async fn delete(&self, public_path: &str) -> Result<bool, ImageStoreError> {
        let Some(path) = self.resolve(public_path) else {
            return Ok(false);
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted image file: {}", path.display());
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
