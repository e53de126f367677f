use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::Serialize;

/// Pairs a class with one of its streams. Teacher assignments point at a pairing,
/// never at a class or stream alone.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "class_streams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub stream_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::school_class::Entity",
        from = "Column::ClassId",
        to = "super::school_class::Column::Id",
        on_delete = "Cascade"
    )]
    SchoolClass,

    #[sea_orm(
        belongs_to = "super::stream::Entity",
        from = "Column::StreamId",
        to = "super::stream::Column::Id",
        on_delete = "Cascade"
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

impl Model {
    pub async fn pair<C: ConnectionTrait>(db: &C, class_id: i64, stream_id: i64) -> Result<Model, DbErr> {
        ActiveModel {
            class_id: Set(class_id),
            stream_id: Set(stream_id),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_pair<C: ConnectionTrait>(
        db: &C,
        class_id: i64,
        stream_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::StreamId.eq(stream_id))
            .one(db)
            .await
    }

    /// Removes a pairing. Returns the number of rows removed (0 or 1).
    pub async fn unpair<C: ConnectionTrait>(db: &C, class_id: i64, stream_id: i64) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::StreamId.eq(stream_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// Streams paired with a class, ordered by stream name.
    pub async fn streams_for_class<C: ConnectionTrait>(
        db: &C,
        class_id: i64,
    ) -> Result<Vec<super::stream::Model>, DbErr> {
        super::stream::Entity::find()
            .inner_join(Entity)
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(super::stream::Column::Name)
            .all(db)
            .await
    }
}
