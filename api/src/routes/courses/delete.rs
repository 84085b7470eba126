use crate::{auth::AuthUser, error::ApiError, response::ApiResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use services::course::CourseService;
use util::state::AppState;

/// DELETE /courses/{id}
///
/// Deletes a course and all of its content items. Admins only.
///
/// ### Responses
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "message": "Course and its content deleted successfully",
///   "data": null
/// }
/// ```
///
/// - `401 Unauthorized`
/// - `404 Not Found`
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    CourseService::delete(&state, &user.caller(), id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success((), "Course and its content deleted successfully")),
    ))
}
