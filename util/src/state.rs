//! Application state container shared across Axum route handlers and services.
//!
//! This struct holds shared resources such as the database connection, the media
//! uploader and the background-task supervisor. It is cheap to clone and is passed
//! into route handlers via Axum's `State<T>` extractor.

use crate::media::MediaUploader;
use crate::supervisor::Supervisor;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    media: Arc<dyn MediaUploader>,
    supervisor: Supervisor,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `db` - A SeaORM `DatabaseConnection`, typically cloned from the main pool.
    /// * `media` - Uploader used by the course workflows.
    /// * `supervisor` - Owner of fire-and-forget background work.
    pub fn new(
        db: DatabaseConnection,
        media: Arc<dyn MediaUploader>,
        supervisor: Supervisor,
    ) -> Self {
        Self {
            db,
            media,
            supervisor,
        }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn media(&self) -> &Arc<dyn MediaUploader> {
        &self.media
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }
}

impl AppState {
    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }
}
