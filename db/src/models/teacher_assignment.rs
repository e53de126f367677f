use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::Serialize;
use std::collections::HashSet;

/// Grants a teacher one subject in one class-stream pairing.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "teacher_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub class_stream_id: i64,
    pub subject_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Teacher,

    #[sea_orm(
        belongs_to = "super::class_stream::Entity",
        from = "Column::ClassStreamId",
        to = "super::class_stream::Column::Id",
        on_delete = "Cascade"
    )]
    ClassStream,

    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id",
        on_delete = "Cascade"
    )]
    Subject,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::class_stream::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassStream.def()
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// An assignment resolved down to the concrete class and stream it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignmentScope {
    pub assignment_id: i64,
    pub subject_id: i64,
    pub class_stream_id: i64,
    pub class_id: i64,
    pub stream_id: i64,
}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        teacher_id: i64,
        class_stream_id: i64,
        subject_id: i64,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            teacher_id: Set(teacher_id),
            class_stream_id: Set(class_stream_id),
            subject_id: Set(subject_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_existing<C: ConnectionTrait>(
        db: &C,
        teacher_id: i64,
        class_stream_id: i64,
        subject_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::ClassStreamId.eq(class_stream_id))
            .filter(Column::SubjectId.eq(subject_id))
            .one(db)
            .await
    }

    pub async fn list<C: ConnectionTrait>(db: &C, teacher_id: Option<i64>) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find().order_by_asc(Column::Id);
        if let Some(teacher_id) = teacher_id {
            query = query.filter(Column::TeacherId.eq(teacher_id));
        }
        query.all(db).await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        Ok(Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }

    /// Every assignment of a teacher with its class and stream resolved, in
    /// ascending assignment id order.
    pub async fn scopes_for_teacher<C: ConnectionTrait>(
        db: &C,
        teacher_id: i64,
    ) -> Result<Vec<AssignmentScope>, DbErr> {
        let rows = Entity::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Id)
            .find_also_related(super::class_stream::Entity)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(assignment, pairing)| {
                pairing.map(|cs| AssignmentScope {
                    assignment_id: assignment.id,
                    subject_id: assignment.subject_id,
                    class_stream_id: cs.id,
                    class_id: cs.class_id,
                    stream_id: cs.stream_id,
                })
            })
            .collect())
    }
}

/// Picks the scope a subject's marks are saved against.
///
/// With an explicit class (and optionally stream) the matching assignment is used;
/// without one, the assignment with the lowest id for that subject wins. `None` when
/// the teacher is not assigned accordingly.
pub fn resolve_scope(
    scopes: &[AssignmentScope],
    subject_id: i64,
    class_id: Option<i64>,
    stream_id: Option<i64>,
) -> Option<AssignmentScope> {
    scopes
        .iter()
        .filter(|s| s.subject_id == subject_id)
        .filter(|s| class_id.is_none_or(|c| s.class_id == c))
        .filter(|s| stream_id.is_none_or(|st| s.stream_id == st))
        .min_by_key(|s| s.assignment_id)
        .copied()
}

/// Ids of every subject the teacher teaches in at least one class-stream.
pub fn assigned_subjects(scopes: &[AssignmentScope]) -> HashSet<i64> {
    scopes.iter().map(|s| s.subject_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(assignment_id: i64, subject_id: i64, class_id: i64, stream_id: i64) -> AssignmentScope {
        AssignmentScope {
            assignment_id,
            subject_id,
            class_stream_id: class_id * 10 + stream_id,
            class_id,
            stream_id,
        }
    }

    #[test]
    fn lowest_assignment_wins_without_explicit_class() {
        let scopes = [scope(7, 1, 5, 2), scope(3, 1, 6, 1), scope(1, 2, 5, 1)];
        assert_eq!(resolve_scope(&scopes, 1, None, None).map(|s| s.assignment_id), Some(3));
    }

    #[test]
    fn explicit_class_and_stream_must_match() {
        let scopes = [scope(7, 1, 5, 2), scope(3, 1, 6, 1)];
        assert_eq!(
            resolve_scope(&scopes, 1, Some(5), Some(2)).map(|s| s.assignment_id),
            Some(7)
        );
        assert!(resolve_scope(&scopes, 1, Some(5), Some(1)).is_none());
        assert!(resolve_scope(&scopes, 9, None, None).is_none());
    }
}
