//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint (public)
//! - `/courses` → Course catalogue and course management
//! - `/resources` → Reviewable resources and their reviews
//! - `/reviews` → Review listing and review management

use crate::routes::{
    courses::course_routes, health::health_routes, resources::resource_routes,
    reviews::review_routes,
};
use axum::Router;
use util::state::AppState;

pub mod courses;
pub mod health;
pub mod resources;
pub mod reviews;

/// Builds the complete application router for all HTTP endpoints.
///
/// Access control is attached per route group; see each group's module.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/courses", course_routes())
        .nest("/resources", resource_routes())
        .nest("/reviews", review_routes())
        .with_state(app_state)
}
