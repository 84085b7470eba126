use crate::{error::ApiError, response::ApiResponse};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use services::resource::{ResourceQuery, ResourceService};
use util::state::AppState;

/// GET /resources
///
/// ### Query Parameters
/// - `page`, `per_page`, `sort` (`title`, `average_rating`, `created_at`)
/// - `query`: case-insensitive title substring
///
/// ### Response
/// - `200 OK` with `count`, `pagination` and `data`
pub async fn list_resources(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ResourceQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let page = ResourceService::list(state.db(), query).await?;
    let count = page.items.len();

    Ok((
        StatusCode::OK,
        Json(
            ApiResponse::success(page.items, "Resources retrieved successfully")
                .with_count(count)
                .with_pagination(page.pagination),
        ),
    ))
}

/// GET /resources/{id}
///
/// ### Responses
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "message": "Resource retrieved successfully",
///   "data": { "id": 2, "title": "The Rust Book", "description": "...", "average_rating": 4.5, ... }
/// }
/// ```
///
/// - `404 Not Found`
pub async fn get_resource(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = ResourceService::get(state.db(), id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(resource, "Resource retrieved successfully")),
    ))
}
