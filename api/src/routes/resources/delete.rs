use crate::{error::ApiError, response::ApiResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use services::resource::ResourceService;
use util::state::AppState;

/// DELETE /resources/{id}
///
/// Deletes a resource together with its reviews.
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`
pub async fn delete_resource(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    ResourceService::remove(state.db(), id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success((), "Resource deleted successfully")),
    ))
}
