mod helpers;

use axum::http::StatusCode;
use helpers::{School, body_json, get, make_test_app, seed_school, send_json, token_for};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use serial_test::serial;

async fn register_pupil(app: &axum::Router, token: &str, school: &School, first_name: &str) -> i64 {
    let response = send_json(
        app,
        "POST",
        "/api/secretary/pupils",
        Some(token),
        &json!({
            "first_name": first_name,
            "last_name": "Achieng",
            "date_of_birth": "2016-03-14",
            "gender": "male",
            "current_class_id": school.class.id,
            "current_stream_id": school.stream.id,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn setup() -> (axum::Router, DatabaseConnection, School, String, Vec<i64>) {
    let (app, db) = make_test_app().await;
    let school = seed_school(&db).await;
    let secretary = helpers::create_user(&db, "clerk", db::models::user::UserRole::Secretary).await;
    let secretary_token = token_for(&secretary);

    let mut pupils = Vec::new();
    for name in ["Otim", "Nakato", "Waiswa"] {
        pupils.push(register_pupil(&app, &secretary_token, &school, name).await);
    }

    let teacher_token = token_for(&school.teacher);
    (app, db, school, teacher_token, pupils)
}

fn save_body(school: &School, marks: Value) -> Value {
    json!({
        "academic_year_id": school.year.id,
        "term_id": school.term.id,
        "exam_type": "End of term",
        "marks_data": [
            { "subject_id": school.science.id, "pupil_marks": marks }
        ]
    })
}

#[tokio::test]
#[serial]
async fn save_marks_then_load_marks_data() {
    let (app, _db, school, token, pupils) = setup().await;

    let body = save_body(
        &school,
        json!([
            { "pupil_id": pupils[0], "marks_obtained": 45, "remarks": "Fair" },
            { "pupil_id": pupils[1], "marks_obtained": "91.5" },
            { "pupil_id": pupils[2], "marks_obtained": "" }
        ]),
    );
    let response = send_json(&app, "POST", "/api/teacher/save-marks", Some(&token), &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["saved_count"], 2);
    assert_eq!(json["message"], "Saved 2 marks successfully");

    let uri = format!(
        "/api/teacher/load-marks-data?academic_year_id={}&term_id={}&exam_type=End%20of%20term",
        school.year.id, school.term.id
    );
    let response = get(&app, &uri, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let sheet = body_json(response).await["data"].clone();

    let key = format!("{}_{}", pupils[1], school.science.id);
    let mark = &sheet["existing_marks"][key.as_str()];
    assert_eq!(mark["marks_obtained"].as_f64(), Some(91.5));
    assert_eq!(mark["grade"], "1");
    assert_eq!(mark["stream_rank"], 1);

    let key = format!("{}_{}", pupils[0], school.science.id);
    assert_eq!(sheet["existing_marks"][key.as_str()]["remarks"], "Fair");
    assert_eq!(sheet["existing_marks"][key.as_str()]["stream_rank"], 2);

    let missing = format!("{}_{}", pupils[2], school.science.id);
    assert!(sheet["existing_marks"].get(missing.as_str()).is_none());

    assert_eq!(sheet["subjects"][0]["name"], "Science");
    assert_eq!(sheet["subjects"][0]["can_edit"], true);
    assert_eq!(sheet["pupils"].as_array().unwrap().len(), 3);
}

#[tokio::test]
#[serial]
async fn save_marks_rejects_out_of_range_marks() {
    let (app, _db, school, token, pupils) = setup().await;

    let body = save_body(&school, json!([{ "pupil_id": pupils[0], "marks_obtained": 120 }]));
    let response = send_json(&app, "POST", "/api/teacher/save-marks", Some(&token), &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);

    let response = get(&app, "/api/teacher/assessment-records?term_id=1", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn malformed_save_body_is_bad_request() {
    let (app, _db, _school, token, _pupils) = setup().await;

    let response = send_json(
        &app,
        "POST",
        "/api/teacher/save-marks",
        Some(&token),
        &json!({ "term_id": "two" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn load_marks_data_requires_every_query_parameter() {
    let (app, _db, school, token, _pupils) = setup().await;

    let uri = format!("/api/teacher/load-marks-data?term_id={}", school.term.id);
    let response = get(&app, &uri, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn calculate_grades_previews_without_saving() {
    let (app, _db, school, token, pupils) = setup().await;

    let mut subject_marks = serde_json::Map::new();
    subject_marks.insert(school.science.id.to_string(), json!(78));
    let body = json!({ "pupil_id": pupils[0], "subject_marks": subject_marks });

    let response = send_json(&app, "POST", "/api/teacher/calculate-grades", Some(&token), &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let preview = body_json(response).await["data"].clone();

    let id = school.science.id.to_string();
    assert_eq!(preview["subject_grades"][id.as_str()], "2");
    assert_eq!(preview["subject_points"][id.as_str()], 2);
    assert_eq!(preview["total_aggregate"], 2);
    assert_eq!(preview["overall_division"], "Division 1");
}

#[tokio::test]
#[serial]
async fn assessment_records_need_a_current_term() {
    let (app, _db, school, token, _pupils) = setup().await;

    let body = json!({
        "subject_id": school.science.id,
        "class_id": school.class.id,
        "stream_id": school.stream.id,
        "assessment_type": "Quiz",
        "title": "Plants quiz",
        "total_marks": 20,
        "assessment_date": "2026-06-10"
    });

    let response = send_json(&app, "POST", "/api/teacher/assessment-records", Some(&token), &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn exam_types_default_to_mid_term() {
    let (app, _db, _school, token, _pupils) = setup().await;

    let response = get(&app, "/api/teacher/exam-types", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!(["Mid-term"]));
}

#[tokio::test]
#[serial]
async fn pupil_profiles_search_and_details() {
    let (app, _db, _school, token, pupils) = setup().await;

    let response = get(&app, "/api/teacher/pupil-profiles", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["total_pupils"], 3);

    let response = get(&app, "/api/teacher/pupil-profiles?search=NAKA", Some(&token)).await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["total_pupils"], 1);
    assert_eq!(data["pupils"][0]["first_name"], "Nakato");
    assert_eq!(data["pupils"][0]["current_class"], "P4");
    assert_eq!(data["pupils"][0]["current_stream"], "East");

    let uri = format!("/api/teacher/pupil-details/{}", pupils[0]);
    let response = get(&app, &uri, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["date_of_birth"], "2016-03-14");

    let response = get(&app, "/api/teacher/pupil-details/9999", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        "Pupil not found or not assigned to you"
    );
}

#[tokio::test]
#[serial]
async fn academic_history_reports_results_and_average() {
    let (app, _db, school, token, pupils) = setup().await;

    let body = save_body(&school, json!([{ "pupil_id": pupils[1], "marks_obtained": 64.5 }]));
    let response = send_json(&app, "POST", "/api/teacher/save-marks", Some(&token), &body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/api/teacher/academic-history", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!(
        "/api/teacher/academic-history?pupil_id={}&term_id={}",
        pupils[1], school.term.id
    );
    let response = get(&app, &uri, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let history = body_json(response).await["data"].clone();
    assert_eq!(history["pupil"]["first_name"], "Nakato");
    assert_eq!(history["assessments"][0]["subject"], "Science");
    assert_eq!(history["assessments"][0]["title"], "End of term - Science");
    assert_eq!(history["assessments"][0]["score"].as_f64(), Some(64.5));
    assert_eq!(history["stats"]["total_assessments"], 1);
    assert_eq!(history["stats"]["average_score"].as_f64(), Some(64.5));

    let uri = format!("/api/teacher/academic-history?pupil_id={}", pupils[0]);
    let history = body_json(get(&app, &uri, Some(&token)).await).await["data"].clone();
    assert_eq!(history["stats"]["total_assessments"], 0);
    assert!(history["stats"]["average_score"].is_null());
}
