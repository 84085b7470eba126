pub mod auth;
pub mod error;
pub mod response;
pub mod routes;

use auth::middleware::log_request;
use axum::{
    Router,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    middleware::from_fn,
};
use tower_http::{cors::CorsLayer, services::ServeDir};
use util::{config::AppConfig, state::AppState};

/// Builds the full HTTP application: the JSON API under `/api`, stored media
/// under `/media`, request logging and CORS.
pub fn app(app_state: AppState) -> Router {
    let media_root = AppConfig::global().media_root();
    let cors = CorsLayer::very_permissive().expose_headers([CONTENT_DISPOSITION, CONTENT_TYPE]);

    Router::new()
        .nest("/api", routes::routes(app_state))
        .nest_service("/media", ServeDir::new(media_root))
        .layer(from_fn(log_request))
        .layer(cors)
}
