//! Assessment records: one row per graded event.
//!
//! A record is identified by its scope (teacher, subject, class, stream, term and
//! assessment type). The scope is backed by a unique index, and records are created
//! with `INSERT OR IGNORE` followed by a read, so two concurrent saves for the same
//! scope always end up on the same row.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Statement, Value};
use serde::Serialize;

/// Default maximum for records created by the marks workflow.
pub const DEFAULT_TOTAL_MARKS: f64 = 100.0;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "assessment_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub stream_id: Option<i64>,
    pub term_id: i64,
    pub assessment_type: String,
    pub title: String,
    pub description: Option<String>,
    pub total_marks: f64,
    pub assessment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::assessment_result::Entity")]
    Results,

    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id",
        on_delete = "Cascade"
    )]
    Subject,
}

impl Related<super::assessment_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Results.def()
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// The identifying key of an assessment record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordScope {
    pub teacher_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub stream_id: Option<i64>,
    pub term_id: i64,
    pub assessment_type: String,
}

/// Descriptive fields written when a record is first created.
#[derive(Debug, Clone)]
pub struct RecordDetails {
    pub title: String,
    pub description: Option<String>,
    pub total_marks: f64,
    pub assessment_date: NaiveDate,
}

impl Model {
    pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_scope<C: ConnectionTrait>(
        db: &C,
        scope: &RecordScope,
    ) -> Result<Option<Model>, DbErr> {
        let stream = match scope.stream_id {
            Some(stream_id) => Column::StreamId.eq(stream_id),
            None => Column::StreamId.is_null(),
        };

        Entity::find()
            .filter(Column::TeacherId.eq(scope.teacher_id))
            .filter(Column::SubjectId.eq(scope.subject_id))
            .filter(Column::ClassId.eq(scope.class_id))
            .filter(stream)
            .filter(Column::TermId.eq(scope.term_id))
            .filter(Column::AssessmentType.eq(scope.assessment_type.as_str()))
            .one(db)
            .await
    }

    /// Inserts a record unless one already exists for the scope.
    ///
    /// Returns the number of rows inserted: `1` for a new record, `0` when the
    /// scope was already taken.
    async fn insert_or_ignore<C: ConnectionTrait>(
        db: &C,
        scope: &RecordScope,
        details: &RecordDetails,
    ) -> Result<u64, DbErr> {
        let now = Utc::now();
        let values: Vec<Value> = vec![
            scope.teacher_id.into(),
            scope.subject_id.into(),
            scope.class_id.into(),
            scope.stream_id.into(),
            scope.term_id.into(),
            scope.assessment_type.clone().into(),
            details.title.clone().into(),
            details.description.clone().into(),
            details.total_marks.into(),
            details.assessment_date.into(),
            now.into(),
            now.into(),
        ];
        let stmt = Statement::from_sql_and_values(
            db.get_database_backend(),
            "INSERT OR IGNORE INTO assessment_records \
             (teacher_id, subject_id, class_id, stream_id, term_id, assessment_type, \
              title, description, total_marks, assessment_date, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            values,
        );

        Ok(db.execute(stmt).await?.rows_affected())
    }

    /// Returns the record for `scope`, creating it first when it does not exist.
    pub async fn find_or_create<C: ConnectionTrait>(
        db: &C,
        scope: &RecordScope,
        details: &RecordDetails,
    ) -> Result<Model, DbErr> {
        Self::insert_or_ignore(db, scope, details).await?;
        Self::find_by_scope(db, scope)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("assessment record vanished after insert".into()))
    }

    /// Creates a record for `scope`. `None` when the scope is already taken.
    pub async fn create_unique<C: ConnectionTrait>(
        db: &C,
        scope: &RecordScope,
        details: &RecordDetails,
    ) -> Result<Option<Model>, DbErr> {
        if Self::insert_or_ignore(db, scope, details).await? == 0 {
            return Ok(None);
        }
        Self::find_by_scope(db, scope).await
    }

    /// All of a teacher's records for one term and assessment type, across subjects.
    pub async fn matching<C: ConnectionTrait>(
        db: &C,
        teacher_id: i64,
        term_id: i64,
        assessment_type: &str,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::TermId.eq(term_id))
            .filter(Column::AssessmentType.eq(assessment_type))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// A teacher's records for a term, newest first.
    pub async fn for_teacher<C: ConnectionTrait>(
        db: &C,
        teacher_id: i64,
        term_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::TermId.eq(term_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }
}
