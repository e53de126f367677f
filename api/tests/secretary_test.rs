mod helpers;

use axum::http::StatusCode;
use db::models::user::UserRole;
use helpers::{body_json, create_user, get, make_test_app, seed_school, send_json, token_for};
use serde_json::json;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn pupils_can_be_registered_searched_and_removed() {
    let (app, db) = make_test_app().await;
    let school = seed_school(&db).await;
    let token = token_for(&create_user(&db, "clerk", UserRole::Secretary).await);

    let response = send_json(
        &app,
        "POST",
        "/api/secretary/pupils",
        Some(&token),
        &json!({
            "first_name": "Grace",
            "last_name": "Nabirye",
            "date_of_birth": "2015-09-02",
            "gender": "female",
            "current_class_id": school.class.id,
            "current_stream_id": school.stream.id,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let pupil = body_json(response).await["data"].clone();
    let pupil_id = pupil["id"].as_i64().unwrap();
    assert!(pupil["admission_number"].as_str().unwrap().ends_with("/001"));

    let response = get(&app, "/api/secretary/pupils?query=nabir", Some(&token)).await;
    let found = body_json(response).await["data"].clone();
    assert_eq!(found.as_array().unwrap().len(), 1);

    let uri = format!("/api/secretary/pupils/{pupil_id}");
    let response = send_json(&app, "DELETE", &uri, Some(&token), &json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get(&app, &uri, Some(&token)).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn a_stream_needs_its_class() {
    let (app, db) = make_test_app().await;
    let school = seed_school(&db).await;
    let token = token_for(&create_user(&db, "clerk", UserRole::Secretary).await);

    let response = send_json(
        &app,
        "POST",
        "/api/secretary/pupils",
        Some(&token),
        &json!({
            "first_name": "Grace",
            "last_name": "Nabirye",
            "date_of_birth": "2015-09-02",
            "gender": "female",
            "current_stream_id": school.stream.id,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn bad_birth_dates_are_rejected() {
    let (app, db) = make_test_app().await;
    let token = token_for(&create_user(&db, "clerk", UserRole::Secretary).await);

    let response = send_json(
        &app,
        "POST",
        "/api/secretary/pupils",
        Some(&token),
        &json!({
            "first_name": "Grace",
            "last_name": "Nabirye",
            "date_of_birth": "02/09/2015",
            "gender": "female",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
