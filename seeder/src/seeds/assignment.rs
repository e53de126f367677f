use crate::seed::Seeder;
use crate::seeds::{SEEDED_CLASSES, SUBJECTS};
use db::models::{class_stream, school_class, subject, teacher_assignment, user};
use sea_orm::{DatabaseConnection, DbErr};

pub struct AssignmentSeeder;

#[async_trait::async_trait]
impl Seeder for AssignmentSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        for (idx, subject_name) in SUBJECTS.iter().enumerate() {
            let email = format!("teacher{}@school.test", idx + 1);
            let (Some(teacher), Some(subject)) = (
                user::Model::find_by_email(db, &email).await?,
                subject::Model::find_by_name(db, subject_name).await?,
            ) else {
                continue;
            };

            for class_name in SEEDED_CLASSES {
                let Some(class) = school_class::Model::find_by_name(db, class_name).await? else {
                    continue;
                };
                for s in class_stream::Model::streams_for_class(db, class.id).await? {
                    let Some(pairing) = class_stream::Model::find_pair(db, class.id, s.id).await? else {
                        continue;
                    };
                    let existing =
                        teacher_assignment::Model::find_existing(db, teacher.id, pairing.id, subject.id)
                            .await?;
                    if existing.is_none() {
                        teacher_assignment::Model::create(db, teacher.id, pairing.id, subject.id).await?;
                    }
                }
            }
        }
        Ok(())
    }
}
