//! Course and content workflow.
//!
//! A course owns an ordered list of content items. Create and edit validate the
//! form, check that every required file was uploaded, push the files through
//! the [`MediaUploader`] and only then write to the database, inside a single
//! transaction:
//!
//! * create: course row, content rows, course content-id list
//! * edit: course fields, delete all content rows, new content rows, course content-id list
//! * delete: content rows, course row
//!
//! Content uploads run concurrently. The first failed upload aborts the rest
//! and the workflow returns before any write. Files already uploaded by then
//! are left in media storage.

use crate::caller::Caller;
use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use db::filters::{ContentFilter, CourseFilter};
use db::models::content;
use db::models::course::{self, Category, ContentIds, Status};
use db::repositories::content_repository::ContentRepository;
use db::repositories::course_repository::CourseRepository;
use db::repositories::repository::Repository;
use sea_orm::{ActiveValue::Set, ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use util::media::{MediaUploader, UploadError};
use util::state::AppState;
use validator::{Validate, ValidationError};

pub use db::models::content::Model as Content;
pub use db::models::course::Model as Course;

/// Multipart field carrying the course thumbnail.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// How many courses [`CourseService::recent`] returns.
pub const RECENT_LIMIT: u64 = 3;

const FIELD_ORDER: &[&str] = &["title", "description", "price", "category", "content"];
const CONTENT_NOT_ARRAY: &str = "\"content\" must be an array";

/// Staged upload paths keyed by multipart field name.
pub type UploadedFiles = HashMap<String, PathBuf>;

/// Multipart field carrying the file of the content item at `index`.
pub fn content_file_field(index: usize) -> String {
    format!("content[{index}].file")
}

/// Raw course form as received. `content` may be a JSON array or its text
/// encoding. `status` is accepted and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Value>,
    pub category: Option<String>,
    pub content: Option<Value>,
    pub status: Option<String>,
}

#[derive(Debug, Validate)]
struct CourseForm {
    #[validate(
        required(message = "\"title\" is required"),
        length(min = 1, message = "\"title\" is not allowed to be empty")
    )]
    title: Option<String>,
    #[validate(
        required(message = "\"description\" is required"),
        length(min = 1, message = "\"description\" is not allowed to be empty")
    )]
    description: Option<String>,
    #[validate(
        required(message = "\"price\" is required"),
        custom(function = "validate_price")
    )]
    price: Option<Value>,
    #[validate(
        required(message = "\"category\" is required"),
        custom(function = "validate_category")
    )]
    category: Option<String>,
    #[validate(custom(function = "validate_content_items"))]
    content: Vec<Value>,
}

/// A form that passed validation.
#[derive(Debug, Clone)]
struct CourseInput {
    title: String,
    description: String,
    price: f64,
    category: Category,
    content_titles: Vec<String>,
}

#[derive(Debug, Clone)]
struct StagedContent {
    title: String,
    path: PathBuf,
}

#[derive(Debug, Clone)]
struct UploadedContent {
    title: String,
    file: String,
}

/// A course with its content ids resolved to content records, in course order.
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: Category,
    pub thumbnail: String,
    pub status: Status,
    pub content: Vec<Content>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseDetail {
    fn populate(course: Course, mut contents: Vec<Content>) -> Self {
        let position: HashMap<i64, usize> = course
            .content
            .0
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        contents.retain(|c| position.contains_key(&c.id));
        contents.sort_by_key(|c| position.get(&c.id).copied().unwrap_or(usize::MAX));

        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            price: course.price,
            category: course.category,
            thumbnail: course.thumbnail,
            status: course.status,
            content: contents,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

pub struct CourseService;

impl CourseService {
    /// Creates a published course with its content.
    pub async fn create(
        state: &AppState,
        caller: &Caller,
        payload: CoursePayload,
        files: &UploadedFiles,
    ) -> Result<Course, ServiceError> {
        authorize(caller, "add")?;
        let input = CourseInput::from_payload(payload)?;

        let thumbnail_path = files
            .get(THUMBNAIL_FIELD)
            .ok_or_else(|| ServiceError::BadRequest("Thumbnail file not provided".to_string()))?;
        let staged = stage_content(&input.content_titles, files)?;

        let thumbnail = state.media().upload_image(thumbnail_path).await?;
        let uploaded = upload_content(Arc::clone(state.media()), staged).await?;

        let txn = state.db().begin().await?;
        let now = Utc::now();
        let course = CourseRepository::create(
            &txn,
            course::ActiveModel {
                title: Set(input.title),
                description: Set(input.description),
                price: Set(input.price),
                category: Set(input.category),
                thumbnail: Set(thumbnail),
                status: Set(Status::Published),
                content: Set(ContentIds::default()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            },
        )
        .await?;
        let ids = insert_content(&txn, course.id, uploaded).await?;
        let course = link_content(&txn, course, ids).await?;
        txn.commit().await?;

        tracing::info!(
            course_id = course.id,
            user_id = caller.id,
            items = course.content.0.len(),
            "Course created"
        );
        Ok(course)
    }

    /// Replaces a course's fields and its whole content set. Without a new
    /// thumbnail the stored one is kept.
    pub async fn edit(
        state: &AppState,
        caller: &Caller,
        id: i64,
        payload: CoursePayload,
        files: &UploadedFiles,
    ) -> Result<Course, ServiceError> {
        authorize(caller, "edit")?;
        let input = CourseInput::from_payload(payload)?;

        let existing = CourseRepository::find_by_id(state.db(), id)
            .await?
            .ok_or_else(course_not_found)?;
        let staged = stage_content(&input.content_titles, files)?;

        let thumbnail = match files.get(THUMBNAIL_FIELD) {
            Some(path) => state.media().upload_image(path).await?,
            None => existing.thumbnail.clone(),
        };
        let uploaded = upload_content(Arc::clone(state.media()), staged).await?;

        let txn = state.db().begin().await?;
        let mut active: course::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.description = Set(input.description);
        active.price = Set(input.price);
        active.category = Set(input.category);
        active.thumbnail = Set(thumbnail);
        active.updated_at = Set(Utc::now());
        let course = CourseRepository::update(&txn, active).await?;

        let removed =
            ContentRepository::delete_where(&txn, &ContentFilter::new().with_course_id(id)).await?;
        let ids = insert_content(&txn, id, uploaded).await?;
        let course = link_content(&txn, course, ids).await?;
        txn.commit().await?;

        tracing::info!(
            course_id = id,
            user_id = caller.id,
            removed,
            items = course.content.0.len(),
            "Course updated"
        );
        Ok(course)
    }

    /// Deletes a course and all of its content.
    pub async fn delete(state: &AppState, caller: &Caller, id: i64) -> Result<(), ServiceError> {
        authorize(caller, "delete")?;

        CourseRepository::find_by_id(state.db(), id)
            .await?
            .ok_or_else(course_not_found)?;

        let txn = state.db().begin().await?;
        let removed =
            ContentRepository::delete_where(&txn, &ContentFilter::new().with_course_id(id)).await?;
        CourseRepository::delete(&txn, id).await?;
        txn.commit().await?;

        tracing::info!(course_id = id, user_id = caller.id, removed, "Course deleted");
        Ok(())
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<Course>, ServiceError> {
        Ok(CourseRepository::find_all(db, &CourseFilter::published(), None).await?)
    }

    /// A published course with its content populated.
    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<CourseDetail, ServiceError> {
        let course = CourseRepository::find_one(db, &CourseFilter::published().with_id(id), None)
            .await?
            .ok_or_else(course_not_found)?;
        let contents =
            ContentRepository::find_all(db, &ContentFilter::new().with_course_id(id), None).await?;

        Ok(CourseDetail::populate(course, contents))
    }

    /// Published courses whose title or description contains `keyword`,
    /// ignoring case.
    ///
    /// Matched in Rust; SQLite `LIKE` and `lower()` fold ASCII only.
    pub async fn search(db: &DatabaseConnection, keyword: &str) -> Result<Vec<Course>, ServiceError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ServiceError::BadRequest(
                "\"keyword\" is not allowed to be empty".to_string(),
            ));
        }

        let needle = keyword.to_lowercase();
        let courses = CourseRepository::find_all(db, &CourseFilter::published(), None).await?;
        Ok(courses
            .into_iter()
            .filter(|c| matches_keyword(c, &needle))
            .collect())
    }

    /// The newest published courses, at most [`RECENT_LIMIT`].
    pub async fn recent(db: &DatabaseConnection) -> Result<Vec<Course>, ServiceError> {
        let (courses, _) = CourseRepository::filter(
            db,
            &CourseFilter::published(),
            1,
            RECENT_LIMIT,
            Some("-created_at".to_string()),
        )
        .await?;
        Ok(courses)
    }
}

fn authorize(caller: &Caller, action: &str) -> Result<(), ServiceError> {
    if caller.role.can_manage_courses() {
        return Ok(());
    }
    tracing::warn!(user_id = caller.id, role = %caller.role, action, "Rejected course mutation");
    Err(ServiceError::Unauthorized(format!(
        "User {} is not authorized to {action} course",
        caller.id
    )))
}

/// `needle` is already lowercased.
fn matches_keyword(course: &Course, needle: &str) -> bool {
    course.title.to_lowercase().contains(needle)
        || course.description.to_lowercase().contains(needle)
}

fn course_not_found() -> ServiceError {
    ServiceError::NotFound("Course not found".to_string())
}

impl CourseInput {
    fn from_payload(payload: CoursePayload) -> Result<Self, ServiceError> {
        if payload.status.is_some() {
            tracing::debug!("Ignoring caller-supplied course status");
        }
        let content = parse_content(payload.content)?;

        let form = CourseForm {
            title: payload.title.map(|t| t.trim().to_string()),
            description: payload.description,
            price: payload.price,
            category: payload.category,
            content,
        };
        form.validate()
            .map_err(|e| ServiceError::invalid(&e, FIELD_ORDER))?;

        let price = form
            .price
            .as_ref()
            .and_then(parse_price)
            .ok_or_else(|| ServiceError::BadRequest("\"price\" must be a number".to_string()))?;
        let category = form
            .category
            .as_deref()
            .and_then(parse_category)
            .ok_or_else(|| {
                ServiceError::BadRequest("\"category\" must be one of [video, book]".to_string())
            })?;

        Ok(Self {
            title: form.title.unwrap_or_default(),
            description: form.description.unwrap_or_default(),
            price,
            category,
            content_titles: form
                .content
                .iter()
                .filter_map(|item| item.get("title").and_then(Value::as_str))
                .map(str::to_string)
                .collect(),
        })
    }
}

/// Accepts a JSON array or a string holding one.
fn parse_content(content: Option<Value>) -> Result<Vec<Value>, ServiceError> {
    let not_array = || ServiceError::BadRequest(CONTENT_NOT_ARRAY.to_string());
    let value = match content {
        Some(Value::String(text)) => serde_json::from_str(&text).map_err(|_| not_array())?,
        Some(value) => value,
        None => return Err(not_array()),
    };
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(not_array()),
    }
}

fn parse_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|p| p.is_finite())
}

fn parse_category(value: &str) -> Option<Category> {
    match value {
        "video" => Some(Category::Video),
        "book" => Some(Category::Book),
        _ => None,
    }
}

fn violation(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

fn validate_price(value: &Value) -> Result<(), ValidationError> {
    match parse_price(value) {
        Some(_) => Ok(()),
        None => Err(violation("price", "\"price\" must be a number".to_string())),
    }
}

#[allow(clippy::ptr_arg)]
fn validate_category(value: &String) -> Result<(), ValidationError> {
    match parse_category(value) {
        Some(_) => Ok(()),
        None => Err(violation(
            "category",
            "\"category\" must be one of [video, book]".to_string(),
        )),
    }
}

#[allow(clippy::ptr_arg)]
fn validate_content_items(items: &Vec<Value>) -> Result<(), ValidationError> {
    for (i, item) in items.iter().enumerate() {
        let Some(fields) = item.as_object() else {
            return Err(violation(
                "content",
                format!("\"content[{i}]\" must be of type object"),
            ));
        };
        match fields.get("title") {
            None | Some(Value::Null) => {
                return Err(violation(
                    "content",
                    format!("\"content[{i}].title\" is required"),
                ));
            }
            Some(Value::String(title)) if title.is_empty() => {
                return Err(violation(
                    "content",
                    format!("\"content[{i}].title\" is not allowed to be empty"),
                ));
            }
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(violation(
                    "content",
                    format!("\"content[{i}].title\" must be a string"),
                ));
            }
        }
    }
    Ok(())
}

/// Pairs each content title with its staged file, failing on the first item
/// whose file is missing.
fn stage_content(titles: &[String], files: &UploadedFiles) -> Result<Vec<StagedContent>, ServiceError> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| match files.get(&content_file_field(i)) {
            Some(path) => Ok(StagedContent {
                title: title.clone(),
                path: path.clone(),
            }),
            None => Err(ServiceError::from(UploadError::MissingFile(title.clone()))),
        })
        .collect()
}

/// Uploads every staged item concurrently and returns the results in input
/// order. The first failure aborts the uploads still in flight.
async fn upload_content(
    media: Arc<dyn MediaUploader>,
    staged: Vec<StagedContent>,
) -> Result<Vec<UploadedContent>, ServiceError> {
    let total = staged.len();
    let mut tasks = JoinSet::new();
    for (index, item) in staged.into_iter().enumerate() {
        let media = Arc::clone(&media);
        tasks.spawn(async move {
            let file = media.upload_video(&item.path).await?;
            Ok::<_, UploadError>((index, UploadedContent { title: item.title, file }))
        });
    }

    let mut slots: Vec<Option<UploadedContent>> = (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined
            .map_err(|e| UploadError::Task(e.to_string()))
            .and_then(|r| r);
        match outcome {
            Ok((index, uploaded)) => slots[index] = Some(uploaded),
            Err(e) => {
                tasks.abort_all();
                tracing::error!(error = %e, "Content upload failed; aborting course write");
                return Err(e.into());
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

async fn insert_content<C: ConnectionTrait>(
    db: &C,
    course_id: i64,
    uploaded: Vec<UploadedContent>,
) -> Result<Vec<i64>, ServiceError> {
    let mut ids = Vec::with_capacity(uploaded.len());
    for item in uploaded {
        let now = Utc::now();
        let created = ContentRepository::create(
            db,
            content::ActiveModel {
                course_id: Set(course_id),
                title: Set(item.title),
                file: Set(item.file),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            },
        )
        .await?;
        ids.push(created.id);
    }
    Ok(ids)
}

async fn link_content<C: ConnectionTrait>(
    db: &C,
    course: Course,
    ids: Vec<i64>,
) -> Result<Course, ServiceError> {
    let mut active: course::ActiveModel = course.into();
    active.content = Set(ContentIds::from(ids));
    Ok(CourseRepository::update(db, active).await?)
}
