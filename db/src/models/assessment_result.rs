use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::Serialize;

/// One pupil's result on one assessment record. Unique per (record, pupil).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "assessment_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assessment_record_id: i64,
    pub pupil_id: i64,
    /// Percentage in `0..=100`. Grade and points are always derived from it.
    pub marks_obtained: f64,
    pub grade: String,
    pub points: i32,
    pub remarks: Option<String>,
    pub stream_rank: Option<i32>,
    pub class_rank: Option<i32>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assessment_record::Entity",
        from = "Column::AssessmentRecordId",
        to = "super::assessment_record::Column::Id",
        on_delete = "Cascade"
    )]
    AssessmentRecord,

    #[sea_orm(
        belongs_to = "super::pupil::Entity",
        from = "Column::PupilId",
        to = "super::pupil::Column::Id",
        on_delete = "Cascade"
    )]
    Pupil,
}

impl Related<super::assessment_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssessmentRecord.def()
    }
}

impl Related<super::pupil::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pupil.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A graded mark ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedMark {
    pub pupil_id: i64,
    pub marks_obtained: f64,
    pub grade: String,
    pub points: i32,
    pub remarks: Option<String>,
}

impl Model {
    /// Inserts the result, or overwrites marks, grade, points and remarks when the
    /// pupil already has one on this record. Ranks are left for the ranking pass.
    pub async fn upsert<C: ConnectionTrait>(
        db: &C,
        assessment_record_id: i64,
        mark: &GradedMark,
    ) -> Result<(), DbErr> {
        let result = ActiveModel {
            assessment_record_id: Set(assessment_record_id),
            pupil_id: Set(mark.pupil_id),
            marks_obtained: Set(mark.marks_obtained),
            grade: Set(mark.grade.clone()),
            points: Set(mark.points),
            remarks: Set(mark.remarks.clone()),
            stream_rank: Set(None),
            class_rank: Set(None),
            submitted_at: Set(Utc::now()),
            ..Default::default()
        };

        Entity::insert(result)
            .on_conflict(
                OnConflict::columns([Column::AssessmentRecordId, Column::PupilId])
                    .update_columns([
                        Column::MarksObtained,
                        Column::Grade,
                        Column::Points,
                        Column::Remarks,
                        Column::SubmittedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Ok(())
    }

    pub async fn for_record<C: ConnectionTrait>(
        db: &C,
        assessment_record_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::AssessmentRecordId.eq(assessment_record_id))
            .order_by_asc(Column::PupilId)
            .all(db)
            .await
    }

    pub async fn for_records<C: ConnectionTrait>(
        db: &C,
        record_ids: &[i64],
    ) -> Result<Vec<Model>, DbErr> {
        if record_ids.is_empty() {
            return Ok(Vec::new());
        }

        Entity::find()
            .filter(Column::AssessmentRecordId.is_in(record_ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// A pupil's results paired with their assessment records, oldest assessment
    /// first.
    pub async fn history_for_pupil<C: ConnectionTrait>(
        db: &C,
        pupil_id: i64,
    ) -> Result<Vec<(Model, super::assessment_record::Model)>, DbErr> {
        let rows = Entity::find()
            .filter(Column::PupilId.eq(pupil_id))
            .find_also_related(super::assessment_record::Entity)
            .order_by_asc(super::assessment_record::Column::AssessmentDate)
            .order_by_asc(Column::Id)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(result, record)| record.map(|record| (result, record)))
            .collect())
    }

    /// Writes the same position to both rank columns.
    pub async fn set_rank<C: ConnectionTrait>(db: &C, id: i64, rank: i32) -> Result<(), DbErr> {
        ActiveModel {
            id: Set(id),
            stream_rank: Set(Some(rank)),
            class_rank: Set(Some(rank)),
            ..Default::default()
        }
        .update(db)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        academic_year,
        assessment_record::{self, RecordDetails, RecordScope},
        pupil::{self, PupilDetails},
        school_class, subject, term,
        user::{self, UserRole},
    };
    use crate::test_utils::setup_test_db;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseConnection, PaginatorTrait};

    async fn record_and_pupil(db: &DatabaseConnection) -> (i64, i64) {
        let teacher = user::Model::create(db, "t1", "t1@school.test", "password1", UserRole::Teacher)
            .await
            .unwrap();
        let class = school_class::Model::create(db, "P6").await.unwrap();
        let subject = subject::Model::create(db, "English").await.unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
        let year = academic_year::Model::create(db, "2025", start, end).await.unwrap();
        let term = term::Model::create(db, "Term 1", year.id, start, end, None)
            .await
            .unwrap();
        let record = assessment_record::Model::find_or_create(
            db,
            &RecordScope {
                teacher_id: teacher.id,
                subject_id: subject.id,
                class_id: class.id,
                stream_id: None,
                term_id: term.id,
                assessment_type: "Mid-term".into(),
            },
            &RecordDetails {
                title: "Mid-term - English".into(),
                description: None,
                total_marks: 100.0,
                assessment_date: start,
            },
        )
        .await
        .unwrap();
        let pupil = pupil::Model::register(
            db,
            PupilDetails {
                first_name: "Amina".into(),
                last_name: "Nakato".into(),
                date_of_birth: NaiveDate::from_ymd_opt(2014, 6, 2).unwrap(),
                gender: "Female".into(),
                address: None,
                nationality: None,
                phone_number: None,
                email: None,
                parent_name: None,
                parent_phone: None,
                parent_email: None,
                emergency_contact_name: None,
                emergency_contact_phone: None,
                current_class_id: Some(class.id),
                current_stream_id: None,
            },
        )
        .await
        .unwrap();

        (record.id, pupil.id)
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_result() {
        let db = setup_test_db().await;
        let (record_id, pupil_id) = record_and_pupil(&db).await;

        let mut mark = GradedMark {
            pupil_id,
            marks_obtained: 58.0,
            grade: "5".into(),
            points: 5,
            remarks: Some("Fair".into()),
        };
        Model::upsert(&db, record_id, &mark).await.unwrap();

        mark.marks_obtained = 81.0;
        mark.grade = "1".into();
        mark.points = 1;
        mark.remarks = None;
        Model::upsert(&db, record_id, &mark).await.unwrap();

        let results = Model::for_record(&db, record_id).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].marks_obtained, 81.0);
        assert_eq!(results[0].points, 1);
        assert_eq!(results[0].remarks, None);
        assert_eq!(Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn set_rank_writes_both_columns() {
        let db = setup_test_db().await;
        let (record_id, pupil_id) = record_and_pupil(&db).await;
        let mark = GradedMark {
            pupil_id,
            marks_obtained: 70.0,
            grade: "3".into(),
            points: 3,
            remarks: None,
        };
        Model::upsert(&db, record_id, &mark).await.unwrap();
        let stored = &Model::for_record(&db, record_id).await.unwrap()[0];

        Model::set_rank(&db, stored.id, 4).await.unwrap();

        let ranked = &Model::for_record(&db, record_id).await.unwrap()[0];
        assert_eq!(ranked.stream_rank, Some(4));
        assert_eq!(ranked.class_rank, Some(4));
    }
}
