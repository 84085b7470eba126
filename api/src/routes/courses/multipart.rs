//! Multipart intake for course create and edit.
//!
//! Text fields become a [`CoursePayload`]; every file field is streamed to a
//! temporary file that keeps the client's extension, keyed by field name
//! (`thumbnail`, `content[0].file`, ...). The staged files live in a
//! [`TempDir`] that is removed when the [`CourseUpload`] is dropped.

use crate::error::ApiError;
use axum::extract::Multipart;
use serde_json::Value;
use services::course::{CoursePayload, UploadedFiles};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use util::{config::AppConfig, paths::ensure_dir};

/// A parsed course form with its staged files.
pub struct CourseUpload {
    pub payload: CoursePayload,
    pub files: UploadedFiles,
    _staging: TempDir,
}

pub async fn read_course_upload(mut multipart: Multipart) -> Result<CourseUpload, ApiError> {
    let tmp_root = ensure_dir(AppConfig::global().upload_tmp_dir)?;
    let staging = tempfile::Builder::new()
        .prefix("course-upload-")
        .tempdir_in(tmp_root)?;

    let mut payload = CoursePayload::default();
    let mut files = UploadedFiles::new();

    while let Some(mut field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(original) = field.file_name().map(str::to_string) {
            let path = staged_path(staging.path(), files.len(), &original);
            let mut file = File::create(&path).await?;
            while let Some(chunk) = field.chunk().await? {
                file.write_all(&chunk).await?;
            }
            file.flush().await?;

            tracing::debug!(field = %name, file = %original, "Staged upload");
            files.insert(name, path);
            continue;
        }

        let text = field.text().await?;
        match name.as_str() {
            "title" => payload.title = Some(text),
            "description" => payload.description = Some(text),
            "category" => payload.category = Some(text),
            "status" => payload.status = Some(text),
            "price" => payload.price = Some(Value::String(text)),
            "content" => payload.content = Some(Value::String(text)),
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(CourseUpload {
        payload,
        files,
        _staging: staging,
    })
}

fn staged_path(dir: &Path, index: usize, original: &str) -> PathBuf {
    match Path::new(original).extension().and_then(|e| e.to_str()) {
        Some(ext) => dir.join(format!("{index}.{}", ext.to_ascii_lowercase())),
        None => dir.join(index.to_string()),
    }
}
