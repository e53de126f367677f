use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::Serialize;

/// A section within a class, e.g. `A` or `Blue`. Streams are shared across classes
/// and paired with them through `class_streams`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "streams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::class_stream::Entity")]
    ClassStreams,
}

impl Related<super::class_stream::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassStreams.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, DbErr> {
        ActiveModel {
            name: Set(name.trim().to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Name.eq(name.trim()))
            .one(db)
            .await
    }

    pub async fn all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find().order_by_asc(Column::Name).all(db).await
    }

    pub async fn rename<C: ConnectionTrait>(db: &C, id: i64, name: &str) -> Result<Model, DbErr> {
        ActiveModel {
            id: Set(id),
            name: Set(name.trim().to_owned()),
            ..Default::default()
        }
        .update(db)
        .await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        Ok(Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }
}
