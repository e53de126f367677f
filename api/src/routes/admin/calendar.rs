//! Academic years, terms and exam schedules.

use crate::response::{ApiResponse, ApiResult, Empty};
use crate::routes::common::{JsonBody, QueryParams, validated};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use db::models::{academic_year, exam_schedule, term};
use serde::Deserialize;
use services::reference::{AcademicYearRequest, ExamScheduleRequest, ReferenceService, TermRequest};
use util::state::AppState;

pub fn calendar_routes() -> Router<AppState> {
    Router::new()
        .route("/academic-years", get(list_years).post(create_year))
        .route("/academic-years/{year_id}", put(update_year).delete(delete_year))
        .route("/terms", get(list_terms).post(create_term))
        .route("/terms/{term_id}", put(update_term).delete(delete_term))
        .route("/exam-schedules", get(list_exams).post(create_exam))
        .route("/exam-schedules/{exam_id}", delete(delete_exam))
}

// --- academic years ---

pub async fn list_years(State(app_state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<academic_year::Model>>>> {
    let years = ReferenceService::list_years(app_state.db()).await?;
    Ok(Json(ApiResponse::success(years, "Academic years retrieved successfully")))
}

/// POST /academic-years `{ name, start_date, end_date }`. `end_date` must come
/// after `start_date`; names are unique.
pub async fn create_year(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<AcademicYearRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<academic_year::Model>>)> {
    let req = validated(req)?;
    let year = ReferenceService::create_year(app_state.db(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(year, "Academic year created successfully")),
    ))
}

pub async fn update_year(
    State(app_state): State<AppState>,
    Path(year_id): Path<i64>,
    JsonBody(req): JsonBody<AcademicYearRequest>,
) -> ApiResult<Json<ApiResponse<academic_year::Model>>> {
    let req = validated(req)?;
    let year = ReferenceService::update_year(app_state.db(), year_id, req).await?;
    Ok(Json(ApiResponse::success(year, "Academic year updated successfully")))
}

pub async fn delete_year(
    State(app_state): State<AppState>,
    Path(year_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    ReferenceService::delete_year(app_state.db(), year_id).await?;
    Ok(Json(ApiResponse::success(Empty {}, "Academic year deleted successfully")))
}

// --- terms ---

#[derive(Debug, Deserialize)]
pub struct TermQuery {
    pub academic_year_id: Option<i64>,
}

pub async fn list_terms(
    State(app_state): State<AppState>,
    QueryParams(query): QueryParams<TermQuery>,
) -> ApiResult<Json<ApiResponse<Vec<term::Model>>>> {
    let terms = ReferenceService::list_terms(app_state.db(), query.academic_year_id).await?;
    Ok(Json(ApiResponse::success(terms, "Terms retrieved successfully")))
}

/// POST /terms `{ name, academic_year_id, start_date, end_date, days? }`.
/// `days` defaults to the inclusive number of calendar days.
pub async fn create_term(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<TermRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<term::Model>>)> {
    let req = validated(req)?;
    let term = ReferenceService::create_term(app_state.db(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(term, "Term created successfully")),
    ))
}

pub async fn update_term(
    State(app_state): State<AppState>,
    Path(term_id): Path<i64>,
    JsonBody(req): JsonBody<TermRequest>,
) -> ApiResult<Json<ApiResponse<term::Model>>> {
    let req = validated(req)?;
    let term = ReferenceService::update_term(app_state.db(), term_id, req).await?;
    Ok(Json(ApiResponse::success(term, "Term updated successfully")))
}

pub async fn delete_term(
    State(app_state): State<AppState>,
    Path(term_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    ReferenceService::delete_term(app_state.db(), term_id).await?;
    Ok(Json(ApiResponse::success(Empty {}, "Term deleted successfully")))
}

// --- exam schedules ---

#[derive(Debug, Deserialize)]
pub struct ExamQuery {
    pub term_id: Option<i64>,
}

pub async fn list_exams(
    State(app_state): State<AppState>,
    QueryParams(query): QueryParams<ExamQuery>,
) -> ApiResult<Json<ApiResponse<Vec<exam_schedule::Model>>>> {
    let exams = ReferenceService::list_exams(app_state.db(), query.term_id).await?;
    Ok(Json(ApiResponse::success(exams, "Exam schedules retrieved successfully")))
}

/// POST /exam-schedules `{ name, term_id, exam_date, subject_id, class_id }`.
/// The same exam twice for one term, subject and class is a `409 Conflict`.
pub async fn create_exam(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<ExamScheduleRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<exam_schedule::Model>>)> {
    let req = validated(req)?;
    let exam = ReferenceService::create_exam(app_state.db(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(exam, "Exam scheduled successfully")),
    ))
}

pub async fn delete_exam(
    State(app_state): State<AppState>,
    Path(exam_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    ReferenceService::delete_exam(app_state.db(), exam_id).await?;
    Ok(Json(ApiResponse::success(Empty {}, "Exam schedule deleted successfully")))
}
