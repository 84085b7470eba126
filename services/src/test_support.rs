//! Fixtures shared by the workflow tests.

use async_trait::async_trait;
use chrono::Utc;
use db::models::{resource, review};
use db::test_utils::setup_test_db;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use util::media::{MediaUploader, UploadError};
use util::state::AppState;
use util::supervisor::Supervisor;

/// Uploader that records every call and fails for files whose name contains
/// `fail_on`.
#[derive(Default)]
pub struct FakeUploader {
    pub fail_on: Option<String>,
    pub calls: Mutex<Vec<PathBuf>>,
}

impl FakeUploader {
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn record(&self, kind: &str, path: &Path) -> Result<String, UploadError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if self.fail_on.as_deref().is_some_and(|f| name.contains(f)) {
            return Err(UploadError::Task(format!("upload of {name} rejected")));
        }
        self.calls.lock().unwrap().push(path.to_path_buf());
        Ok(format!("http://media.test/{kind}/{name}"))
    }
}

#[async_trait]
impl MediaUploader for FakeUploader {
    async fn upload_image(&self, path: &Path) -> Result<String, UploadError> {
        self.record("images", path)
    }

    async fn upload_video(&self, path: &Path) -> Result<String, UploadError> {
        self.record("videos", path)
    }
}

pub async fn test_state() -> AppState {
    test_state_with(Arc::new(FakeUploader::default())).await
}

pub async fn test_state_with(media: Arc<dyn MediaUploader>) -> AppState {
    AppState::new(setup_test_db().await, media, Supervisor::new())
}

pub async fn insert_resource(db: &DatabaseConnection, title: &str) -> resource::Model {
    let now = Utc::now();
    resource::ActiveModel {
        title: Set(title.to_string()),
        description: Set(format!("About {title}")),
        average_rating: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn insert_review(
    db: &DatabaseConnection,
    resource_id: i64,
    user_id: i64,
    rating: i32,
) -> review::Model {
    let now = Utc::now();
    review::ActiveModel {
        resource_id: Set(resource_id),
        user_id: Set(user_id),
        rating: Set(rating),
        text: Set("Solid".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
