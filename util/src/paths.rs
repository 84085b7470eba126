use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

// ─── Media layout ──────────────────────────────────────────────

/// Course thumbnails: {MEDIA_ROOT}/images
pub fn images_dir(root: &Path) -> PathBuf {
    root.join("images")
}

/// Course content files: {MEDIA_ROOT}/videos
pub fn videos_dir(root: &Path) -> PathBuf {
    root.join("videos")
}

/// Stored file name for an upload: `<id>.<ext>`, or just `<id>` when the
/// source had no extension.
pub fn stored_file_name(id: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => format!("{id}.{}", ext.to_ascii_lowercase()),
        _ => id.to_string(),
    }
}

/// Public URL of a stored file: `{base}/{kind}/{file}`.
pub fn media_url(base_url: &str, kind: &str, file_name: &str) -> String {
    format!("{}/{kind}/{file_name}", base_url.trim_end_matches('/'))
}
