use crate::{error::ApiError, response::ApiResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use services::resource::{ResourceService, UpdateResource};
use util::state::AppState;

/// PUT /resources/{id}
///
/// Updates `title` and/or `description`. The average rating is derived and
/// cannot be set.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request`
/// - `404 Not Found`
pub async fn update_resource(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(params), _): WithRejection<Json<UpdateResource>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = ResourceService::edit(state.db(), id, params).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(resource, "Resource updated successfully")),
    ))
}
