//! # Course Routes Module
//!
//! Routes for the `/courses` endpoint group.
//!
//! ## Structure
//! - `get.rs`: public reads (list, by id, search, recent)
//! - `post.rs`: course creation (multipart)
//! - `put.rs`: course replacement (multipart)
//! - `delete.rs`: course deletion
//! - `multipart.rs`: form intake and upload staging
//!
//! ## Access
//! Reads are public. Mutations require a valid token; the workflow itself
//! rejects callers that are not admins.

pub mod delete;
pub mod get;
pub mod multipart;
pub mod post;
pub mod put;

use crate::auth::guards::allow_authenticated;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use util::{config::AppConfig, state::AppState};

/// Builds the `/courses` route group.
///
/// - `GET /courses` → `list_courses`
/// - `GET /courses/recent` → `recent_courses`
/// - `GET /courses/search/{keyword}` → `search_courses`
/// - `GET /courses/{id}` → `get_course`
/// - `POST /courses` → `create_course` (authenticated)
/// - `PUT /courses/{id}` → `edit_course` (authenticated)
/// - `DELETE /courses/{id}` → `delete_course` (authenticated)
pub fn course_routes() -> Router<AppState> {
    let body_limit = AppConfig::global().max_upload_bytes();

    let mutations = Router::new()
        .route("/", post(post::create_course))
        .route("/{id}", put(put::edit_course))
        .route("/{id}", delete(delete::delete_course))
        .route_layer(from_fn(allow_authenticated))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/", get(get::list_courses))
        .route("/recent", get(get::recent_courses))
        .route("/search/{keyword}", get(get::search_courses))
        .route("/{id}", get(get::get_course))
        .merge(mutations)
}
