use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryOrder, Set};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "terms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub academic_year_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of school days in the term.
    pub days: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::academic_year::Entity",
        from = "Column::AcademicYearId",
        to = "super::academic_year::Column::Id",
        on_delete = "Cascade"
    )]
    AcademicYear,
}

impl Related<super::academic_year::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicYear.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Inclusive calendar day count between two dates; `0` when `end` precedes `start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i32 {
    let days = (end - start).num_days() + 1;
    i32::try_from(days.max(0)).unwrap_or(i32::MAX)
}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        name: &str,
        academic_year_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        days: Option<i32>,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            name: Set(name.trim().to_owned()),
            academic_year_id: Set(academic_year_id),
            start_date: Set(start_date),
            end_date: Set(end_date),
            days: Set(days.unwrap_or_else(|| inclusive_days(start_date, end_date))),
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
        days: Option<i32>,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            id: Set(id),
            name: Set(name.trim().to_owned()),
            start_date: Set(start_date),
            end_date: Set(end_date),
            days: Set(days.unwrap_or_else(|| inclusive_days(start_date, end_date))),
            ..Default::default()
        }
        .update(db)
        .await
    }

    pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn for_year<C: ConnectionTrait>(db: &C, academic_year_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::AcademicYearId.eq(academic_year_id))
            .order_by_asc(Column::StartDate)
            .all(db)
            .await
    }

    pub async fn all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .order_by_desc(Column::StartDate)
            .all(db)
            .await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        Ok(Entity::delete_by_id(id).exec(db).await?.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::inclusive_days;
    use chrono::NaiveDate;

    #[test]
    fn day_count_includes_both_ends() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 2, 7).unwrap();
        assert_eq!(inclusive_days(start, end), 5);
        assert_eq!(inclusive_days(end, start), 0);
    }
}
