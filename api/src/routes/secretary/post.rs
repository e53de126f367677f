use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::{JsonBody, validated};
use axum::{Json, extract::State, http::StatusCode};
use db::models::pupil;
use services::pupils::{PupilRequest, PupilService};
use util::state::AppState;

/// POST /secretary/pupils
///
/// Registers a pupil. The admission number (`AD/<year>/<NNN>`) is generated.
///
/// ### Request Body
/// ```json
/// {
///   "first_name": "Grace",
///   "last_name": "Akello",
///   "date_of_birth": "2015-03-09",
///   "gender": "female",
///   "current_class_id": 1,
///   "current_stream_id": 2
/// }
/// ```
///
/// - `201 Created`
/// - `400 Bad Request` for missing names or gender, a malformed date, or a stream
///   that is not part of the class
pub async fn register_pupil(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<PupilRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<pupil::Model>>)> {
    let req = validated(req)?;
    let pupil = PupilService::register(app_state.db(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(pupil, "Pupil registered successfully")),
    ))
}
