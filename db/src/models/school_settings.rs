//! The school-wide settings row.
//!
//! There is exactly one row, with id [`SETTINGS_ID`]. It is created with defaults
//! on first read, so callers never have to handle a missing row.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::Serialize;

pub const SETTINGS_ID: i64 = 1;
pub const DEFAULT_SCHOOL_NAME: &str = "Primary School";
pub const DEFAULT_MIN_PASSWORD_LENGTH: i32 = 8;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "school_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub school_name: String,
    pub current_academic_year_id: Option<i64>,
    pub current_term_id: Option<i64>,
    /// While set, only admins may log in.
    pub maintenance_mode: bool,
    pub min_password_length: i32,
    pub updated_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Fields an administrator may change. `None` leaves a field untouched; for the
/// nullable references `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct SettingsChanges {
    pub school_name: Option<String>,
    pub current_academic_year_id: Option<Option<i64>>,
    pub current_term_id: Option<Option<i64>>,
    pub maintenance_mode: Option<bool>,
    pub min_password_length: Option<i32>,
}

impl Model {
    pub async fn get_or_init<C: ConnectionTrait>(db: &C) -> Result<Model, DbErr> {
        if let Some(settings) = Entity::find_by_id(SETTINGS_ID).one(db).await? {
            return Ok(settings);
        }

        ActiveModel {
            id: Set(SETTINGS_ID),
            school_name: Set(DEFAULT_SCHOOL_NAME.to_string()),
            current_academic_year_id: Set(None),
            current_term_id: Set(None),
            maintenance_mode: Set(false),
            min_password_length: Set(DEFAULT_MIN_PASSWORD_LENGTH),
            updated_by: Set(None),
            updated_at: Set(Utc::now()),
        }
        .insert(db)
        .await
    }

    pub async fn apply<C: ConnectionTrait>(
        db: &C,
        changes: SettingsChanges,
        updated_by: i64,
    ) -> Result<Model, DbErr> {
        let current = Self::get_or_init(db).await?;
        let mut active: ActiveModel = current.into();

        if let Some(name) = changes.school_name {
            active.school_name = Set(name.trim().to_owned());
        }
        if let Some(year) = changes.current_academic_year_id {
            active.current_academic_year_id = Set(year);
        }
        if let Some(term) = changes.current_term_id {
            active.current_term_id = Set(term);
        }
        if let Some(flag) = changes.maintenance_mode {
            active.maintenance_mode = Set(flag);
        }
        if let Some(len) = changes.min_password_length {
            active.min_password_length = Set(len);
        }
        active.updated_by = Set(Some(updated_by));
        active.updated_at = Set(Utc::now());

        active.update(db).await
    }
}
