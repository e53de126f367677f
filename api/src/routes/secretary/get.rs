use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::QueryParams;
use axum::{
    Json,
    extract::{Path, State},
};
use db::models::pupil;
use services::pupils::{PupilQuery, PupilService};
use util::state::AppState;

/// GET /secretary/pupils?class_id=&stream_id=&status=&query=
///
/// Pupils ordered by last name, then first name. `query` matches first name, last
/// name or admission number; `status` is one of `active`, `inactive`, `graduated`
/// or `transferred`.
pub async fn list_pupils(
    State(app_state): State<AppState>,
    QueryParams(query): QueryParams<PupilQuery>,
) -> ApiResult<Json<ApiResponse<Vec<pupil::Model>>>> {
    let pupils = PupilService::list(app_state.db(), query).await?;
    Ok(Json(ApiResponse::success(pupils, "Pupils retrieved successfully")))
}

/// GET /secretary/pupils/{pupil_id}
pub async fn get_pupil(
    State(app_state): State<AppState>,
    Path(pupil_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<pupil::Model>>> {
    let pupil = PupilService::get(app_state.db(), pupil_id).await?;
    Ok(Json(ApiResponse::success(pupil, "Pupil retrieved successfully")))
}
