use crate::{error::ApiError, response::ApiResponse};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use services::review::{ReviewQuery, ReviewService};
use util::state::AppState;

/// GET /reviews
///
/// Lists reviews across all resources.
///
/// ### Query Parameters
/// - `page` (default `1`), `per_page` (default `25`, max `100`)
/// - `sort`: comma separated, `-` prefix for descending (`rating`, `created_at`, `updated_at`)
/// - `rating`, `user_id`, `resource_id`: exact-match filters
///
/// ### Response
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "message": "Reviews retrieved successfully",
///   "count": 1,
///   "pagination": { "page": 1, "per_page": 1, "total": 3, "next": { "page": 2, "per_page": 1 } },
///   "data": [
///     { "id": 1, "resource_id": 2, "user_id": 5, "rating": 4, "text": "Clear and practical", ... }
///   ]
/// }
/// ```
pub async fn list_reviews(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ReviewQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let page = ReviewService::list(state.db(), query).await?;
    let count = page.items.len();

    Ok((
        StatusCode::OK,
        Json(
            ApiResponse::success(page.items, "Reviews retrieved successfully")
                .with_count(count)
                .with_pagination(page.pagination),
        ),
    ))
}

/// GET /resources/{id}/reviews
///
/// Every review of one resource. An unknown resource yields an empty list.
pub async fn list_resource_reviews(
    State(state): State<AppState>,
    WithRejection(Path(resource_id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = ReviewService::list_for_resource(state.db(), resource_id).await?;
    let count = reviews.len();

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(reviews, "Reviews retrieved successfully").with_count(count)),
    ))
}

/// GET /reviews/{id}
///
/// One review, with its resource reduced to `{id, title}`.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`
///
/// ```json
/// {
///   "success": false,
///   "error": "No review found with the id of 42"
/// }
/// ```
pub async fn get_review(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let review = ReviewService::get(state.db(), id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(review, "Review retrieved successfully")),
    ))
}
