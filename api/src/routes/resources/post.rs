use crate::{error::ApiError, response::ApiResponse};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use services::resource::{CreateResource, ResourceService};
use services::service::Service;
use util::state::AppState;

/// POST /resources
///
/// ### Request Body
/// ```json
/// { "title": "The Rust Book", "description": "The official guide" }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (`"Please add a title"`, `"Title must be between 1 and 100 characters"`, ...)
/// - `401 Unauthorized` / `403 Forbidden`
pub async fn create_resource(
    State(state): State<AppState>,
    WithRejection(Json(params), _): WithRejection<Json<CreateResource>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = ResourceService::create(state.db(), params).await?;
    tracing::info!(resource_id = resource.id, "Resource created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(resource, "Resource created successfully")),
    ))
}
