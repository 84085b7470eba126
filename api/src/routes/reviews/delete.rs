use crate::{auth::AuthUser, error::ApiError, response::ApiResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use services::review::ReviewService;
use util::state::AppState;

/// DELETE /reviews/{id}
///
/// Deletes a review. Only its author or an admin may do so.
///
/// ### Responses
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "message": "Review deleted successfully",
///   "data": {}
/// }
/// ```
///
/// - `401 Unauthorized`
/// - `404 Not Found`
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    ReviewService::remove(&state, &user.caller(), id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({}), "Review deleted successfully")),
    ))
}
