use crate::{error::ApiError, response::ApiResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use services::course::CourseService;
use util::state::AppState;

/// GET /courses
///
/// Lists every published course, newest first. No pagination.
///
/// ### Response
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "message": "Courses retrieved successfully",
///   "data": [
///     {
///       "id": 1,
///       "title": "Rust for Beginners",
///       "description": "Ownership from first principles",
///       "price": 19.99,
///       "category": "video",
///       "thumbnail": "http://127.0.0.1:3000/media/images/3f1c....png",
///       "status": "published",
///       "content": [1, 2],
///       "created_at": "2026-01-01T00:00:00Z",
///       "updated_at": "2026-01-01T00:00:00Z"
///     }
///   ]
/// }
/// ```
pub async fn list_courses(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let courses = CourseService::list(state.db()).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(courses, "Courses retrieved successfully")),
    ))
}

/// GET /courses/{id}
///
/// Returns one published course with its content items populated in course
/// order.
///
/// ### Responses
/// - `200 OK` with `data.content` as an array of `{id, course_id, title, file, ...}`
/// - `404 Not Found`
///
/// ```json
/// {
///   "success": false,
///   "error": "Course not found"
/// }
/// ```
pub async fn get_course(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let course = CourseService::get_by_id(state.db(), id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(course, "Course retrieved successfully")),
    ))
}

/// GET /courses/search/{keyword}
///
/// Published courses whose title or description contains `keyword`, ignoring
/// case. The keyword is matched literally.
///
/// ### Responses
/// - `200 OK` with `data` as an array of courses (possibly empty)
/// - `400 Bad Request` for a blank keyword
///
/// ```json
/// {
///   "success": false,
///   "error": "\"keyword\" is not allowed to be empty"
/// }
/// ```
pub async fn search_courses(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let courses = CourseService::search(state.db(), &keyword).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(courses, "Courses retrieved successfully")),
    ))
}

/// GET /courses/recent
///
/// The three newest published courses.
pub async fn recent_courses(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let courses = CourseService::recent(state.db()).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(courses, "Recent courses retrieved successfully")),
    ))
}
