use crate::auth::AuthUser;
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::{JsonBody, validated};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::assessment_record;
use serde::Serialize;
use services::assessment_records::{AssessmentRecordService, CreateAssessmentRecord};
use services::marks::{CalculateGrades, GradePreview, MarksService, SaveMarks, SaveOutcome};
use util::state::AppState;

/// POST /teacher/save-marks
///
/// Grades and stores marks for one term and exam type, then re-ranks every
/// assessment of the teacher in that term and exam type.
///
/// ### Request Body
/// ```json
/// {
///   "academic_year_id": 1,
///   "term_id": 2,
///   "exam_type": "Mid-term",
///   "marks_data": [
///     {
///       "subject_id": 3,
///       "pupil_marks": [
///         { "pupil_id": 10, "marks_obtained": 85, "remarks": "Good" },
///         { "pupil_id": 11, "marks_obtained": "", "remarks": null }
///       ]
///     }
///   ]
/// }
/// ```
///
/// Subjects the teacher is not assigned to are skipped. A blank or `null` mark is
/// left out; any other value must be a percentage in `0..=100`.
///
/// ### Responses
/// - `200 OK` with `{ saved_count }` and message `"Saved <n> marks successfully"`
/// - `400 Bad Request` for a malformed body, an invalid mark, an unknown pupil or
///   a term outside the academic year. Nothing is written.
pub async fn save_marks(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(req): JsonBody<SaveMarks>,
) -> ApiResult<Json<ApiResponse<SaveOutcome>>> {
    let outcome = MarksService::save_marks(app_state.db(), user.id(), req).await?;
    let message = format!("Saved {} marks successfully", outcome.saved_count);
    Ok(Json(ApiResponse::success(outcome, message)))
}

/// POST /teacher/calculate-grades
///
/// Previews grades, points, aggregate and division for `subject_marks`
/// (`{"<subject_id>": percentage}`). Nothing is stored.
pub async fn calculate_grades(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(req): JsonBody<CalculateGrades>,
) -> ApiResult<Json<ApiResponse<GradePreview>>> {
    let preview = MarksService::calculate_grades(app_state.db(), user.id(), req).await?;
    Ok(Json(ApiResponse::success(preview, "Grades calculated successfully")))
}

/// POST /teacher/assessment-records
///
/// Creates an assessment record in the current term.
///
/// - `201 Created`
/// - `400 Bad Request` when no current term is set or validation fails
/// - `403 Forbidden` when the teacher does not teach the subject in that class
/// - `409 Conflict` when the record already exists
pub async fn create_assessment_record(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(req): JsonBody<CreateAssessmentRecord>,
) -> ApiResult<(StatusCode, Json<ApiResponse<assessment_record::Model>>)> {
    let req = validated(req)?;
    let record = AssessmentRecordService::create(app_state.db(), user.id(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(record, "Assessment record created successfully")),
    ))
}

#[derive(Debug, Serialize)]
pub struct RankOutcome {
    pub ranked_count: usize,
}

/// POST /teacher/assessment-records/{record_id}/rank
///
/// Recomputes the stored ranks of one of the teacher's records.
pub async fn rank_assessment_record(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(record_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<RankOutcome>>> {
    let ranked_count = MarksService::rank_owned_assessment(app_state.db(), user.id(), record_id).await?;
    Ok(Json(ApiResponse::success(
        RankOutcome { ranked_count },
        "Assessment ranked successfully",
    )))
}
