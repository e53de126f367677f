use chrono::NaiveDate;
use db::models::{
    academic_year, class_stream, school_class, stream, subject, teacher_assignment, term,
    user::{self, UserRole},
};
use sea_orm::DatabaseConnection;

/// P4 with stream East; the teacher is assigned Science there.
pub struct School {
    pub teacher: user::Model,
    pub class: school_class::Model,
    pub stream: stream::Model,
    pub science: subject::Model,
    pub year: academic_year::Model,
    pub term: term::Model,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn create_user(db: &DatabaseConnection, name: &str, role: UserRole) -> user::Model {
    user::Model::create(db, name, &format!("{name}@school.test"), "password123", role)
        .await
        .unwrap()
}

pub async fn seed_school(db: &DatabaseConnection) -> School {
    let teacher = create_user(db, "okot", UserRole::Teacher).await;
    let class = school_class::Model::create(db, "P4").await.unwrap();
    let stream = stream::Model::create(db, "East").await.unwrap();
    let pairing = class_stream::Model::pair(db, class.id, stream.id).await.unwrap();
    let science = subject::Model::create(db, "Science").await.unwrap();
    teacher_assignment::Model::create(db, teacher.id, pairing.id, science.id)
        .await
        .unwrap();

    let year = academic_year::Model::create(db, "2026", date(2026, 1, 1), date(2026, 12, 31))
        .await
        .unwrap();
    let term = term::Model::create(db, "Term 2", year.id, date(2026, 5, 1), date(2026, 8, 15), None)
        .await
        .unwrap();

    School { teacher, class, stream, science, year, term }
}
