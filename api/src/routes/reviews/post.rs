use crate::{auth::AuthUser, error::ApiError, response::ApiResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use services::review::{CreateReview, ReviewService};
use util::state::AppState;

/// POST /resources/{id}/reviews
///
/// Adds a review by the caller. Any author or resource ids in the body are
/// ignored.
///
/// ### Request Body
/// ```json
/// { "rating": 4, "text": "Clear and practical" }
/// ```
///
/// ### Responses
/// - `201 Created` with the stored review
/// - `400 Bad Request` (validation failure, or the caller already reviewed this resource)
///
/// ```json
/// {
///   "success": false,
///   "error": "Duplicate field value entered"
/// }
/// ```
///
/// - `401 Unauthorized`
/// - `404 Not Found` (no such resource)
pub async fn add_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(resource_id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(params), _): WithRejection<Json<CreateReview>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let review = ReviewService::add(&state, &user.caller(), resource_id, params).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(review, "Review created successfully")),
    ))
}
