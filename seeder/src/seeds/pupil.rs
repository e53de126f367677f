use crate::seed::Seeder;
use crate::seeds::SEEDED_CLASSES;
use chrono::NaiveDate;
use db::models::{
    class_stream, school_class,
    pupil::{Model, PupilDetails},
};
use fake::{
    Fake,
    faker::{
        address::en::CityName,
        name::en::{FirstName, LastName, Name},
        phone_number::en::PhoneNumber,
    },
};
use sea_orm::{DatabaseConnection, DbErr};

pub struct PupilSeeder;

const PUPILS_PER_STREAM: usize = 12;

/// P7 pupils are about twelve, P5 about ten.
fn birth_year(class_name: &str) -> i32 {
    match class_name {
        "P7" => 2014,
        "P6" => 2015,
        _ => 2016,
    }
}

#[async_trait::async_trait]
impl Seeder for PupilSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        for class_name in SEEDED_CLASSES {
            let Some(class) = school_class::Model::find_by_name(db, class_name).await? else {
                continue;
            };
            for s in class_stream::Model::streams_for_class(db, class.id).await? {
                for _ in 0..PUPILS_PER_STREAM {
                    let date_of_birth = NaiveDate::from_ymd_opt(
                        birth_year(class_name),
                        fastrand::u32(1..=12),
                        fastrand::u32(1..=28),
                    )
                    .ok_or_else(|| DbErr::Custom("invalid birth date".into()))?;
                    let gender = if fastrand::bool() { "male" } else { "female" };

                    Model::register(
                        db,
                        PupilDetails {
                            first_name: FirstName().fake(),
                            last_name: LastName().fake(),
                            date_of_birth,
                            gender: gender.to_string(),
                            address: Some(CityName().fake()),
                            nationality: Some("Ugandan".to_string()),
                            phone_number: None,
                            email: None,
                            parent_name: Some(Name().fake()),
                            parent_phone: Some(PhoneNumber().fake()),
                            parent_email: None,
                            emergency_contact_name: None,
                            emergency_contact_phone: None,
                            current_class_id: Some(class.id),
                            current_stream_id: Some(s.id),
                        },
                    )
                    .await?;
                }
            }
        }
        Ok(())
    }
}
