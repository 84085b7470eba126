//! Media upload boundary.
//!
//! Workflows hand a staged local file to a [`MediaUploader`] and get back a
//! durable URL. [`LocalMediaStore`] keeps uploads on disk under the configured
//! media root; the server exposes that directory under `/media`.

use crate::paths::{ensure_dir, images_dir, media_url, stored_file_name, videos_dir};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("File not provided for {0}")]
    MissingFile(String),

    #[error("Uploaded {0} file is empty")]
    Empty(&'static str),

    #[error("Unsupported media type '{mime}' for {kind} upload")]
    UnsupportedType { kind: &'static str, mime: String },

    #[error("Media storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Stores an image (course thumbnail) and returns its public URL.
    async fn upload_image(&self, path: &Path) -> Result<String, UploadError>;

    /// Stores a content file and returns its public URL.
    async fn upload_video(&self, path: &Path) -> Result<String, UploadError>;
}

/// Disk-backed uploader. Files are copied to `{root}/images` or `{root}/videos`
/// under a fresh uuid name, keeping the original extension.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `kind` names the public subdirectory, `label` the file in errors.
    async fn store(
        &self,
        path: &Path,
        dir: PathBuf,
        kind: &'static str,
        label: &'static str,
    ) -> Result<String, UploadError> {
        let meta = tokio::fs::metadata(path).await?;
        if meta.len() == 0 {
            return Err(UploadError::Empty(label));
        }

        let dir = ensure_dir(dir)?;
        let id = uuid::Uuid::new_v4().to_string();
        let ext = path.extension().and_then(|e| e.to_str());
        let file_name = stored_file_name(&id, ext);

        tokio::fs::copy(path, dir.join(&file_name)).await?;

        tracing::debug!(kind, file = %file_name, bytes = meta.len(), "Stored media file");
        Ok(media_url(&self.base_url, kind, &file_name))
    }
}

#[async_trait]
impl MediaUploader for LocalMediaStore {
    async fn upload_image(&self, path: &Path) -> Result<String, UploadError> {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(UploadError::UnsupportedType {
                kind: "image",
                mime: mime.essence_str().to_string(),
            });
        }
        self.store(path, images_dir(&self.root), "images", "image").await
    }

    async fn upload_video(&self, path: &Path) -> Result<String, UploadError> {
        self.store(path, videos_dir(&self.root), "videos", "video").await
    }
}
