//! # Resource Routes Module
//!
//! Routes for the `/resources` endpoint group: reviewable resources and, under
//! `/resources/{id}/reviews`, their reviews.
//!
//! ## Access
//! Reads are public. Create, update and delete are admin-only.

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use crate::auth::guards::allow_admin;
use crate::routes::reviews::resource_review_routes;
use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use util::state::AppState;

/// Builds the `/resources` route group.
///
/// - `GET /resources` → `list_resources`
/// - `GET /resources/{id}` → `get_resource`
/// - `POST /resources` → `create_resource` (admin)
/// - `PUT /resources/{id}` → `update_resource` (admin)
/// - `DELETE /resources/{id}` → `delete_resource` (admin)
/// - `/resources/{id}/reviews` → see [`resource_review_routes`]
pub fn resource_routes() -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(post::create_resource))
        .route("/{id}", put(put::update_resource))
        .route("/{id}", delete(delete::delete_resource))
        .route_layer(from_fn(allow_admin));

    Router::new()
        .route("/", get(get::list_resources))
        .route("/{id}", get(get::get_resource))
        .merge(admin)
        .merge(resource_review_routes())
}
