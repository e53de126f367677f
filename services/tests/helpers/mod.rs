#![allow(dead_code)]

use chrono::NaiveDate;
use db::models::{
    academic_year, class_stream, school_class, stream, subject, teacher_assignment, term,
    pupil::{self, PupilDetails},
    user::{self, UserRole},
};
use sea_orm::DatabaseConnection;

/// A teacher who teaches Math in P5/A, with a current year and term.
pub struct School {
    pub teacher: user::Model,
    pub class: school_class::Model,
    pub stream: stream::Model,
    pub math: subject::Model,
    pub english: subject::Model,
    pub year: academic_year::Model,
    pub term: term::Model,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn create_user(db: &DatabaseConnection, name: &str, role: UserRole) -> user::Model {
    user::Model::create(db, name, &format!("{name}@school.test"), "password123", role)
        .await
        .unwrap()
}

pub async fn seed_school(db: &DatabaseConnection) -> School {
    let teacher = create_user(db, "teacher1", UserRole::Teacher).await;
    let class = school_class::Model::create(db, "P5").await.unwrap();
    let stream = stream::Model::create(db, "A").await.unwrap();
    let pairing = class_stream::Model::pair(db, class.id, stream.id).await.unwrap();
    let math = subject::Model::create(db, "Mathematics").await.unwrap();
    let english = subject::Model::create(db, "English").await.unwrap();
    teacher_assignment::Model::create(db, teacher.id, pairing.id, math.id)
        .await
        .unwrap();

    let year = academic_year::Model::create(db, "2026", date(2026, 1, 1), date(2026, 12, 31))
        .await
        .unwrap();
    let term = term::Model::create(db, "Term 1", year.id, date(2026, 2, 1), date(2026, 4, 30), None)
        .await
        .unwrap();

    School { teacher, class, stream, math, english, year, term }
}

pub async fn add_pupil(
    db: &DatabaseConnection,
    first_name: &str,
    class_id: Option<i64>,
    stream_id: Option<i64>,
) -> pupil::Model {
    pupil::Model::register(
        db,
        PupilDetails {
            first_name: first_name.to_string(),
            last_name: "Okello".to_string(),
            date_of_birth: date(2015, 6, 1),
            gender: "female".to_string(),
            address: None,
            nationality: None,
            phone_number: None,
            email: None,
            parent_name: None,
            parent_phone: None,
            parent_email: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            current_class_id: class_id,
            current_stream_id: stream_id,
        },
    )
    .await
    .unwrap()
}
