use super::multipart::read_course_upload;
use crate::{auth::AuthUser, error::ApiError, response::ApiResponse};
use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use services::course::CourseService;
use util::state::AppState;

/// PUT /courses/{id}
///
/// Replaces a course's fields and its entire content set. Admins only.
///
/// Same form as `POST /courses`, except `thumbnail` is optional: without it
/// the stored thumbnail is kept. Content items that are not resubmitted are
/// deleted.
///
/// ### Responses
/// - `200 OK` with the updated course
/// - `400 Bad Request` (validation failure)
/// - `401 Unauthorized`
/// - `404 Not Found` (no course with that id)
/// - `500 Internal Server Error` (upload or storage failure)
pub async fn edit_course(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let upload = read_course_upload(multipart).await?;
    let course =
        CourseService::edit(&state, &user.caller(), id, upload.payload, &upload.files).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(course, "Course updated successfully")),
    ))
}
