use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, ConnectionTrait, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "pupils")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `AD/<year>/<NNN>`, generated at registration.
    pub admission_number: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub address: Option<String>,
    pub nationality: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub parent_email: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub current_class_id: Option<i64>,
    pub current_stream_id: Option<i64>,
    pub enrollment_date: NaiveDate,
    pub status: PupilStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "pupil_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PupilStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "graduated")]
    Graduated,
    #[sea_orm(string_value = "transferred")]
    Transferred,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::school_class::Entity",
        from = "Column::CurrentClassId",
        to = "super::school_class::Column::Id",
        on_delete = "SetNull"
    )]
    SchoolClass,

    #[sea_orm(
        belongs_to = "super::stream::Entity",
        from = "Column::CurrentStreamId",
        to = "super::stream::Column::Id",
        on_delete = "SetNull"
    )]
    Stream,
}

impl Related<super::school_class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchoolClass.def()
    }
}

impl Related<super::stream::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stream.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Everything captured when a pupil is registered or edited.
#[derive(Debug, Clone)]
pub struct PupilDetails {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub address: Option<String>,
    pub nationality: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub parent_email: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub current_class_id: Option<i64>,
    pub current_stream_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct PupilFilter {
    pub class_id: Option<i64>,
    pub stream_id: Option<i64>,
    pub status: Option<PupilStatus>,
    /// Case-insensitive match on first name, last name or admission number.
    pub query: Option<String>,
}

const ADMISSION_PREFIX: &str = "AD";

/// Formats an admission number, e.g. `AD/2025/007`.
pub fn format_admission_number(year: i32, sequence: u32) -> String {
    format!("{ADMISSION_PREFIX}/{year}/{sequence:03}")
}

/// Sequence part of an admission number, if it has the expected shape.
pub fn admission_sequence(admission_number: &str) -> Option<u32> {
    admission_number.rsplit('/').next()?.parse().ok()
}

impl Model {
    /// Next free admission number for `year`: one past the highest sequence issued
    /// that year, starting at `001`.
    pub async fn next_admission_number<C: ConnectionTrait>(db: &C, year: i32) -> Result<String, DbErr> {
        let prefix = format!("{ADMISSION_PREFIX}/{year}/");
        let issued = Entity::find()
            .filter(Column::AdmissionNumber.starts_with(&prefix))
            .all(db)
            .await?;

        let next = issued
            .iter()
            .filter_map(|p| admission_sequence(&p.admission_number))
            .max()
            .map_or(1, |n| n + 1);

        Ok(format_admission_number(year, next))
    }

    pub async fn register<C: ConnectionTrait>(db: &C, details: PupilDetails) -> Result<Model, DbErr> {
        let now = Utc::now();
        let admission_number = Self::next_admission_number(db, now.year()).await?;

        ActiveModel {
            admission_number: Set(admission_number),
            first_name: Set(details.first_name.trim().to_owned()),
            last_name: Set(details.last_name.trim().to_owned()),
            date_of_birth: Set(details.date_of_birth),
            gender: Set(details.gender),
            address: Set(details.address),
            nationality: Set(details.nationality),
            phone_number: Set(details.phone_number),
            email: Set(details.email),
            parent_name: Set(details.parent_name),
            parent_phone: Set(details.parent_phone),
            parent_email: Set(details.parent_email),
            emergency_contact_name: Set(details.emergency_contact_name),
            emergency_contact_phone: Set(details.emergency_contact_phone),
            current_class_id: Set(details.current_class_id),
            current_stream_id: Set(details.current_stream_id),
            enrollment_date: Set(now.date_naive()),
            status: Set(PupilStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn update_details<C: ConnectionTrait>(
        db: &C,
        id: i64,
        details: PupilDetails,
        status: Option<PupilStatus>,
    ) -> Result<Model, DbErr> {
        let mut pupil = ActiveModel {
            id: Set(id),
            first_name: Set(details.first_name.trim().to_owned()),
            last_name: Set(details.last_name.trim().to_owned()),
            date_of_birth: Set(details.date_of_birth),
            gender: Set(details.gender),
            address: Set(details.address),
            nationality: Set(details.nationality),
            phone_number: Set(details.phone_number),
            email: Set(details.email),
            parent_name: Set(details.parent_name),
            parent_phone: Set(details.parent_phone),
            parent_email: Set(details.parent_email),
            emergency_contact_name: Set(details.emergency_contact_name),
            emergency_contact_phone: Set(details.emergency_contact_phone),
            current_class_id: Set(details.current_class_id),
            current_stream_id: Set(details.current_stream_id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(status) = status {
            pupil.status = Set(status);
        }

        pupil.update(db).await
    }

    pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn search<C: ConnectionTrait>(db: &C, filter: &PupilFilter) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find();

        if let Some(class_id) = filter.class_id {
            query = query.filter(Column::CurrentClassId.eq(class_id));
        }
        if let Some(stream_id) = filter.stream_id {
            query = query.filter(Column::CurrentStreamId.eq(stream_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(Column::Status.eq(status));
        }
        if let Some(q) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(Column::FirstName.contains(q))
                    .add(Column::LastName.contains(q))
                    .add(Column::AdmissionNumber.contains(q)),
            );
        }

        query
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .all(db)
            .await
    }

    /// Pupils currently placed in any of the given `(class_id, stream_id)` pairs,
    /// ordered by class id, first name, last name.
    pub async fn in_class_streams<C: ConnectionTrait>(
        db: &C,
        pairs: &[(i64, i64)],
    ) -> Result<Vec<Model>, DbErr> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let placement = pairs.iter().fold(Condition::any(), |cond, (class_id, stream_id)| {
            cond.add(
                Condition::all()
                    .add(Column::CurrentClassId.eq(*class_id))
                    .add(Column::CurrentStreamId.eq(*stream_id)),
            )
        });

        Entity::find()
            .filter(placement)
            .order_by_asc(Column::CurrentClassId)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::LastName)
            .all(db)
            .await
    }

    /// The subset of `ids` that belong to existing pupils.
    pub async fn existing_ids<C: ConnectionTrait>(db: &C, ids: &[i64]) -> Result<HashSet<i64>, DbErr> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let found: Vec<i64> = Entity::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(db)
            .await?;

        Ok(found.into_iter().collect())
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        Ok(Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    fn details(first: &str, last: &str) -> PupilDetails {
        PupilDetails {
            first_name: first.into(),
            last_name: last.into(),
            date_of_birth: NaiveDate::from_ymd_opt(2015, 2, 11).unwrap(),
            gender: "Male".into(),
            address: None,
            nationality: Some("Ugandan".into()),
            phone_number: None,
            email: None,
            parent_name: None,
            parent_phone: None,
            parent_email: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            current_class_id: None,
            current_stream_id: None,
        }
    }

    #[tokio::test]
    async fn registration_issues_sequential_admission_numbers() {
        let db = setup_test_db().await;
        let year = Utc::now().year();

        let first = Model::register(&db, details("Brian", "Okello")).await.unwrap();
        let second = Model::register(&db, details("Grace", "Auma")).await.unwrap();

        assert_eq!(first.admission_number, format_admission_number(year, 1));
        assert_eq!(second.admission_number, format_admission_number(year, 2));
        assert_eq!(second.status, PupilStatus::Active);
    }

    #[tokio::test]
    async fn search_matches_names_and_admission_numbers() {
        let db = setup_test_db().await;
        Model::register(&db, details("Brian", "Okello")).await.unwrap();
        Model::register(&db, details("Grace", "Auma")).await.unwrap();

        let filter = PupilFilter {
            query: Some("auma".into()),
            ..Default::default()
        };
        let found = Model::search(&db, &filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name(), "Grace Auma");
    }

    #[test]
    fn admission_numbers_are_zero_padded() {
        assert_eq!(format_admission_number(2025, 7), "AD/2025/007");
        assert_eq!(format_admission_number(2025, 1234), "AD/2025/1234");
        assert_eq!(admission_sequence("AD/2025/042"), Some(42));
        assert_eq!(admission_sequence("garbage"), None);
    }
}
