use crate::{auth::AuthUser, error::ApiError, response::ApiResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use services::review::{ReviewService, UpdateReview};
use util::state::AppState;

/// PUT /reviews/{id}
///
/// Updates `rating` and/or `text` of a review. Only its author or an admin
/// may do so. The resource's average rating is recomputed afterwards.
///
/// ### Responses
/// - `201 Created` with the updated review
/// - `400 Bad Request`
/// - `401 Unauthorized`
///
/// ```json
/// {
///   "success": false,
///   "error": "Not authorized to update review"
/// }
/// ```
///
/// - `404 Not Found`
pub async fn update_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(params), _): WithRejection<Json<UpdateReview>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let review = ReviewService::edit(&state, &user.caller(), id, params).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(review, "Review updated successfully")),
    ))
}
