use crate::auth::AuthUser;
use crate::response::{ApiResponse, ApiResult};
use crate::routes::common::QueryParams;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use db::models::assessment_record;
use serde::Deserialize;
use services::assessment_records::AssessmentRecordService;
use services::marks::{
    AcademicHistory, AcademicHistoryQuery, LoadMarks, MarksService, MarksSheet, PupilDetailsView,
    PupilProfiles, PupilSearch,
};
use services::reference::ReferenceService;
use util::state::AppState;

/// GET /teacher/load-marks-data?academic_year_id=&term_id=&exam_type=
///
/// Returns the marks sheet: the teacher's pupils with aggregate points, division
/// and stream/class positions, every subject flagged with `can_edit`, existing
/// marks keyed by `"<pupil_id>_<subject_id>"`, and the group sizes.
///
/// All three query parameters are required (`400` otherwise).
pub async fn load_marks_data(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryParams(query): QueryParams<LoadMarks>,
) -> ApiResult<Json<ApiResponse<MarksSheet>>> {
    let sheet = MarksService::load_marks_data(app_state.db(), user.id(), query).await?;
    Ok(Json(ApiResponse::success(sheet, "Marks data loaded successfully")))
}

/// GET /teacher/exam-types
///
/// Distinct exam names from the exam schedule, or `["Mid-term"]` when nothing is
/// scheduled yet.
pub async fn exam_types(State(app_state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<String>>>> {
    let types = ReferenceService::exam_types(app_state.db()).await?;
    Ok(Json(ApiResponse::success(types, "Exam types retrieved successfully")))
}

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub term_id: Option<i64>,
}

/// GET /teacher/assessment-records?term_id=
///
/// The teacher's assessment records, newest first. Without `term_id` the current
/// term from the school settings is used.
pub async fn list_assessment_records(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryParams(query): QueryParams<RecordsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<assessment_record::Model>>>> {
    let records = AssessmentRecordService::list(app_state.db(), user.id(), query.term_id).await?;
    Ok(Json(ApiResponse::success(records, "Assessment records retrieved successfully")))
}

/// GET /teacher/pupil-profiles?search=
///
/// Pupils placed in the teacher's assigned class streams. `search` matches first
/// name, last name or admission number, ignoring case.
///
/// ```json
/// {
///   "pupils": [{ "id": 4, "first_name": "Amina", "last_name": "Okello",
///                "admission_number": "AD/2026/004", "current_class": "P5",
///                "current_stream": "A" }],
///   "total_pupils": 1
/// }
/// ```
pub async fn pupil_profiles(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryParams(query): QueryParams<PupilSearch>,
) -> ApiResult<Json<ApiResponse<PupilProfiles>>> {
    let profiles = MarksService::pupil_profiles(app_state.db(), user.id(), query).await?;
    Ok(Json(ApiResponse::success(profiles, "Pupil profiles retrieved successfully")))
}

/// GET /teacher/pupil-details/{pupil_id}
///
/// `404` when the pupil is not in one of the teacher's class streams.
pub async fn pupil_details(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(pupil_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<PupilDetailsView>>> {
    let details = MarksService::pupil_details(app_state.db(), user.id(), pupil_id).await?;
    Ok(Json(ApiResponse::success(details, "Pupil details retrieved successfully")))
}

/// GET /teacher/academic-history?pupil_id=&academic_year_id=&term_id=
///
/// Every result the pupil has, with `stats.total_assessments` and
/// `stats.average_score`. `pupil_id` is required (`400` otherwise); a pupil outside
/// the teacher's class streams is `404`.
pub async fn academic_history(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryParams(query): QueryParams<AcademicHistoryQuery>,
) -> ApiResult<Json<ApiResponse<AcademicHistory>>> {
    let history = MarksService::academic_history(app_state.db(), user.id(), query).await?;
    Ok(Json(ApiResponse::success(history, "Academic history retrieved successfully")))
}
