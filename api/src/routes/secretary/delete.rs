use crate::response::{ApiResponse, ApiResult, Empty};
use axum::{
    Json,
    extract::{Path, State},
};
use services::pupils::PupilService;
use util::state::AppState;

/// DELETE /secretary/pupils/{pupil_id}
///
/// Removes the pupil together with their assessment results.
pub async fn delete_pupil(
    State(app_state): State<AppState>,
    Path(pupil_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    PupilService::delete(app_state.db(), pupil_id).await?;
    Ok(Json(ApiResponse::success(Empty {}, "Pupil deleted successfully")))
}
