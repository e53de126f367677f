use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::{JsonBody, validated};
use axum::{
    Json,
    extract::{Path, State},
};
use db::models::pupil;
use services::pupils::{PupilRequest, PupilService};
use util::state::AppState;

/// PUT /secretary/pupils/{pupil_id}
///
/// Replaces a pupil's details. `status` is optional and left unchanged when absent.
pub async fn update_pupil(
    State(app_state): State<AppState>,
    Path(pupil_id): Path<i64>,
    JsonBody(req): JsonBody<PupilRequest>,
) -> ApiResult<Json<ApiResponse<pupil::Model>>> {
    let req = validated(req)?;
    let pupil = PupilService::update(app_state.db(), pupil_id, req).await?;
    Ok(Json(ApiResponse::success(pupil, "Pupil updated successfully")))
}
