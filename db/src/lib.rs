pub mod filters;
pub mod models;
pub mod repositories;
pub mod test_utils;


use sea_orm::{Database, DatabaseConnection, DbErr};
use std::path::Path;

/// Connects to the configured database.
///
/// A value that is already a DSN is used as-is; anything else is treated as a
/// SQLite file path, created on first use together with its parent directory.
pub async fn connect(path_or_url: &str) -> Result<DatabaseConnection, DbErr> {
    let url = if path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("mysql://")
    {
        path_or_url.to_string()
    } else {
        util::paths::ensure_parent_dir(Path::new(path_or_url))
            .map_err(|e| DbErr::Custom(format!("Failed to create database directory: {e}")))?;
        format!("sqlite://{path_or_url}?mode=rwc")
    };

    tracing::debug!(url = %url, "Connecting to database");
    Database::connect(&url).await
}
