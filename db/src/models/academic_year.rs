use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "academic_years")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// e.g. `2025`.
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::term::Entity")]
    Terms,
}

impl Related<super::term::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Terms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            name: Set(name.trim().to_owned()),
            start_date: Set(start_date),
            end_date: Set(end_date),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: i64,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            id: Set(id),
            name: Set(name.trim().to_owned()),
            start_date: Set(start_date),
            end_date: Set(end_date),
        }
        .update(db)
        .await
    }

    pub async fn find_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<Model>, DbErr> {
        Entity::find().filter(Column::Name.eq(name.trim())).one(db).await
    }

    /// Newest year first.
    pub async fn all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find().order_by_desc(Column::StartDate).all(db).await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        Ok(Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }
}
