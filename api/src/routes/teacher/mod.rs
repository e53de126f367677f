//! # teacher Routes Module
//!
//! Marks entry and assessments for the signed-in teacher. Every route sits behind
//! `allow_teacher`.
//!
//! - `POST /teacher/save-marks` → [`post::save_marks`]
//! - `GET /teacher/load-marks-data` → [`get::load_marks_data`]
//! - `POST /teacher/calculate-grades` → [`post::calculate_grades`]
//! - `GET /teacher/exam-types` → [`get::exam_types`]
//! - `GET /teacher/assessment-records` → [`get::list_assessment_records`]
//! - `POST /teacher/assessment-records` → [`post::create_assessment_record`]
//! - `POST /teacher/assessment-records/{record_id}/rank` → [`post::rank_assessment_record`]
//! - `GET /teacher/pupil-profiles` → [`get::pupil_profiles`]
//! - `GET /teacher/pupil-details/{pupil_id}` → [`get::pupil_details`]
//! - `GET /teacher/academic-history` → [`get::academic_history`]

pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{get, post},
};
use get::{
    academic_history, exam_types, list_assessment_records, load_marks_data, pupil_details,
    pupil_profiles,
};
use post::{calculate_grades, create_assessment_record, rank_assessment_record, save_marks};
use util::state::AppState;

pub fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/save-marks", post(save_marks))
        .route("/load-marks-data", get(load_marks_data))
        .route("/calculate-grades", post(calculate_grades))
        .route("/exam-types", get(exam_types))
        .route(
            "/assessment-records",
            get(list_assessment_records).post(create_assessment_record),
        )
        .route(
            "/assessment-records/{record_id}/rank",
            post(rank_assessment_record),
        )
        .route("/pupil-profiles", get(pupil_profiles))
        .route("/pupil-details/{pupil_id}", get(pupil_details))
        .route("/academic-history", get(academic_history))
}
