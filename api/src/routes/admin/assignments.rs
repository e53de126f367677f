use crate::response::{ApiResponse, ApiResult, Empty};
use crate::routes::common::{JsonBody, QueryParams};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use db::models::teacher_assignment;
use serde::Deserialize;
use services::reference::{AssignmentView, CreateAssignment, ReferenceService};
use util::state::AppState;

/// - `GET /teacher-assignments?teacher_id=` → [`list_assignments`]
/// - `POST /teacher-assignments` → [`create_assignment`]
/// - `DELETE /teacher-assignments/{assignment_id}` → [`delete_assignment`]
pub fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assignments).post(create_assignment))
        .route("/{assignment_id}", delete(delete_assignment))
}

#[derive(Debug, Deserialize)]
pub struct AssignmentQuery {
    pub teacher_id: Option<i64>,
}

pub async fn list_assignments(
    State(app_state): State<AppState>,
    QueryParams(query): QueryParams<AssignmentQuery>,
) -> ApiResult<Json<ApiResponse<Vec<AssignmentView>>>> {
    let assignments = ReferenceService::list_assignments(app_state.db(), query.teacher_id).await?;
    Ok(Json(ApiResponse::success(assignments, "Teacher assignments retrieved successfully")))
}

/// POST /teacher-assignments
///
/// ```json
/// { "teacher_id": 4, "class_id": 1, "stream_id": 2, "subject_id": 3 }
/// ```
///
/// - `201 Created`
/// - `400 Bad Request` when the user is not a teacher or the stream is not part of
///   the class
/// - `409 Conflict` when the assignment exists
pub async fn create_assignment(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<CreateAssignment>,
) -> ApiResult<(StatusCode, Json<ApiResponse<teacher_assignment::Model>>)> {
    let assignment = ReferenceService::assign_teacher(app_state.db(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(assignment, "Teacher assigned successfully")),
    ))
}

pub async fn delete_assignment(
    State(app_state): State<AppState>,
    Path(assignment_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    ReferenceService::remove_assignment(app_state.db(), assignment_id).await?;
    Ok(Json(ApiResponse::success(Empty {}, "Teacher assignment removed")))
}
