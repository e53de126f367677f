use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, QuerySelect, Set};
use serde::Serialize;

/// Fallback exam type offered when no exam has been scheduled yet.
pub const DEFAULT_EXAM_TYPE: &str = "Mid-term";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "exam_schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Exam name, e.g. `Mid-term` or `End of Term`. Doubles as the assessment type.
    pub name: String,
    pub term_id: i64,
    pub exam_date: NaiveDate,
    pub subject_id: i64,
    pub class_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::term::Entity",
        from = "Column::TermId",
        to = "super::term::Column::Id",
        on_delete = "Cascade"
    )]
    Term,
}

impl Related<super::term::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Term.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        name: &str,
        term_id: i64,
        exam_date: NaiveDate,
        subject_id: i64,
        class_id: i64,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            name: Set(name.trim().to_owned()),
            term_id: Set(term_id),
            exam_date: Set(exam_date),
            subject_id: Set(subject_id),
            class_id: Set(class_id),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_duplicate<C: ConnectionTrait>(
        db: &C,
        name: &str,
        term_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Name.eq(name.trim()))
            .filter(Column::TermId.eq(term_id))
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::ClassId.eq(class_id))
            .one(db)
            .await
    }

    pub async fn list<C: ConnectionTrait>(db: &C, term_id: Option<i64>) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find().order_by_asc(Column::ExamDate);
        if let Some(term_id) = term_id {
            query = query.filter(Column::TermId.eq(term_id));
        }
        query.all(db).await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        Ok(Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }

    /// Distinct exam names, alphabetically. Falls back to [`DEFAULT_EXAM_TYPE`].
    pub async fn exam_types<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, DbErr> {
        let names: Vec<String> = Entity::find()
            .select_only()
            .column(Column::Name)
            .distinct()
            .order_by_asc(Column::Name)
            .into_tuple()
            .all(db)
            .await?;

        if names.is_empty() {
            Ok(vec![DEFAULT_EXAM_TYPE.to_string()])
        } else {
            Ok(names)
        }
    }
}
