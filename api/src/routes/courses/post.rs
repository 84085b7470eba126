use super::multipart::read_course_upload;
use crate::{auth::AuthUser, error::ApiError, response::ApiResponse};
use axum::{
    Extension, Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use services::course::CourseService;
use util::state::AppState;

/// POST /courses
///
/// Creates a published course. Admins only.
///
/// ### Multipart Body (form-data)
/// - `title`, `description`, `price`, `category` (`video` | `book`)
/// - `content`: JSON array of `{ "title": "..." }`, one per content item
/// - `thumbnail`: image file
/// - `content[<i>].file`: the file of content item `i`
///
/// ### Example curl
/// ```bash
/// curl -X POST http://localhost:3000/api/courses \
///   -H "Authorization: Bearer <token>" \
///   -F "title=Rust for Beginners" \
///   -F "description=Ownership from first principles" \
///   -F "price=19.99" \
///   -F "category=video" \
///   -F 'content=[{"title":"Intro"}]' \
///   -F "thumbnail=@cover.png" \
///   -F "content[0].file=@intro.mp4"
/// ```
///
/// ### Responses
/// - `201 Created`
///
/// ```json
/// {
///   "success": true,
///   "message": "Course created successfully",
///   "data": { "id": 1, "title": "Rust for Beginners", "status": "published", "content": [1], ... }
/// }
/// ```
///
/// - `400 Bad Request` (validation failure, missing thumbnail)
/// - `401 Unauthorized` (missing token, or caller is not an admin)
/// - `500 Internal Server Error` (upload or storage failure)
pub async fn create_course(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let upload = read_course_upload(multipart).await?;
    let course =
        CourseService::create(&state, &user.caller(), upload.payload, &upload.files).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(course, "Course created successfully")),
    ))
}
