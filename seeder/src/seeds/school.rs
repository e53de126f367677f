use crate::seed::Seeder;
use crate::seeds::{SEEDED_CLASSES, STREAMS, SUBJECTS};
use db::models::{class_stream, school_class, stream, subject};
use sea_orm::{DatabaseConnection, DbErr};

pub struct SchoolSeeder;

const ALL_CLASSES: [&str; 7] = ["P1", "P2", "P3", "P4", "P5", "P6", "P7"];

#[async_trait::async_trait]
impl Seeder for SchoolSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        for name in ALL_CLASSES {
            if school_class::Model::find_by_name(db, name).await?.is_none() {
                school_class::Model::create(db, name).await?;
            }
        }

        let mut streams = Vec::new();
        for name in STREAMS {
            let existing = stream::Model::find_by_name(db, name).await?;
            streams.push(match existing {
                Some(s) => s,
                None => stream::Model::create(db, name).await?,
            });
        }

        for name in SUBJECTS {
            if subject::Model::find_by_name(db, name).await?.is_none() {
                subject::Model::create(db, name).await?;
            }
        }

        for class_name in SEEDED_CLASSES {
            let Some(class) = school_class::Model::find_by_name(db, class_name).await? else {
                continue;
            };
            for s in &streams {
                if class_stream::Model::find_pair(db, class.id, s.id).await?.is_none() {
                    class_stream::Model::pair(db, class.id, s.id).await?;
                }
            }
        }
        Ok(())
    }
}
