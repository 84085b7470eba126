//! # Review Routes Module
//!
//! Routes for the `/reviews` endpoint group. Reviews of a single resource are
//! reached through `/resources/{id}/reviews`, see [`resource_review_routes`].

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use crate::auth::guards::allow_authenticated;
use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use util::state::AppState;

/// Builds the `/reviews` route group.
///
/// - `GET /reviews` → `list_reviews` (filtered, sorted, paginated)
/// - `GET /reviews/{id}` → `get_review`
/// - `PUT /reviews/{id}` → `update_review` (authenticated, author or admin)
/// - `DELETE /reviews/{id}` → `delete_review` (authenticated, author or admin)
pub fn review_routes() -> Router<AppState> {
    let mutations = Router::new()
        .route("/{id}", put(put::update_review))
        .route("/{id}", delete(delete::delete_review))
        .route_layer(from_fn(allow_authenticated));

    Router::new()
        .route("/", get(get::list_reviews))
        .route("/{id}", get(get::get_review))
        .merge(mutations)
}

/// Builds the `/resources/{id}/reviews` route group.
///
/// - `GET` → `list_resource_reviews`
/// - `POST` → `add_review` (authenticated)
pub fn resource_review_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/reviews",
            post(post::add_review).route_layer(from_fn(allow_authenticated)),
        )
        .route("/{id}/reviews", get(get::list_resource_reviews))
}
