use crate::seed::Seeder;
use crate::seeds::{SEEDED_CLASSES, SUBJECTS};
use chrono::NaiveDate;
use db::models::{
    academic_year, exam_schedule, school_class,
    school_settings::{self, SettingsChanges},
    subject, term, user,
};
use sea_orm::{DatabaseConnection, DbErr};

pub struct CalendarSeeder;

const YEAR: i32 = 2026;

/// Name, start and end (month, day) of each term.
const TERMS: [(&str, (u32, u32), (u32, u32)); 3] = [
    ("Term 1", (2, 2), (5, 1)),
    ("Term 2", (5, 25), (8, 21)),
    ("Term 3", (9, 14), (12, 4)),
];

const EXAMS: [(&str, (u32, u32)); 3] = [
    ("Beginning of term", (2, 16)),
    ("Mid-term", (3, 16)),
    ("End of term", (4, 20)),
];

fn day(month: u32, day: u32) -> Result<NaiveDate, DbErr> {
    NaiveDate::from_ymd_opt(YEAR, month, day)
        .ok_or_else(|| DbErr::Custom(format!("invalid date {YEAR}-{month}-{day}")))
}

#[async_trait::async_trait]
impl Seeder for CalendarSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let year_name = YEAR.to_string();
        let year = match academic_year::Model::find_by_name(db, &year_name).await? {
            Some(year) => year,
            None => academic_year::Model::create(db, &year_name, day(1, 1)?, day(12, 31)?).await?,
        };

        let existing = term::Model::for_year(db, year.id).await?;
        let mut first_term = None;
        for (name, (sm, sd), (em, ed)) in TERMS {
            let term = match existing.iter().find(|t| t.name == name) {
                Some(t) => t.clone(),
                None => term::Model::create(db, name, year.id, day(sm, sd)?, day(em, ed)?, None).await?,
            };
            first_term.get_or_insert(term);
        }
        let Some(first_term) = first_term else {
            return Ok(());
        };

        for class_name in SEEDED_CLASSES {
            let Some(class) = school_class::Model::find_by_name(db, class_name).await? else {
                continue;
            };
            for subject_name in SUBJECTS {
                let Some(subject) = subject::Model::find_by_name(db, subject_name).await? else {
                    continue;
                };
                for (exam, (m, d)) in EXAMS {
                    let duplicate =
                        exam_schedule::Model::find_duplicate(db, exam, first_term.id, subject.id, class.id)
                            .await?;
                    if duplicate.is_none() {
                        exam_schedule::Model::create(db, exam, first_term.id, day(m, d)?, subject.id, class.id)
                            .await?;
                    }
                }
            }
        }

        let admin = user::Model::find_by_email(db, "admin@school.test")
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("admin user".into()))?;
        school_settings::Model::apply(
            db,
            SettingsChanges {
                school_name: Some("Kampala Hillside Primary School".into()),
                current_academic_year_id: Some(Some(year.id)),
                current_term_id: Some(Some(first_term.id)),
                ..Default::default()
            },
            admin.id,
        )
        .await?;
        Ok(())
    }
}
