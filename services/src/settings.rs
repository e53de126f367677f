use crate::error::{ServiceError, ServiceResult};
use db::models::{
    academic_year,
    school_settings::{self, SettingsChanges},
    term,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Full replacement of the editable settings.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSettings {
    #[validate(length(min = 1, max = 200, message = "school_name is required"))]
    pub school_name: String,
    #[serde(default)]
    pub current_academic_year_id: Option<i64>,
    #[serde(default)]
    pub current_term_id: Option<i64>,
    #[serde(default)]
    pub maintenance_mode: bool,
    #[validate(range(min = 4, max = 128, message = "min_password_length must be between 4 and 128"))]
    pub min_password_length: i32,
}

pub struct SettingsService;

impl SettingsService {
    pub async fn get(db: &DatabaseConnection) -> ServiceResult<school_settings::Model> {
        Ok(school_settings::Model::get_or_init(db).await?)
    }

    /// Replaces the settings. A current term must belong to the current academic
    /// year, so a term cannot be set without a year.
    pub async fn update(
        db: &DatabaseConnection,
        admin_id: i64,
        req: UpdateSettings,
    ) -> ServiceResult<school_settings::Model> {
        if let Some(year_id) = req.current_academic_year_id {
            if academic_year::Entity::find_by_id(year_id).one(db).await?.is_none() {
                return Err(ServiceError::validation(format!(
                    "Academic year {year_id} does not exist"
                )));
            }
        }

        if let Some(term_id) = req.current_term_id {
            let term = term::Model::get_by_id(db, term_id)
                .await?
                .ok_or_else(|| ServiceError::validation(format!("Term {term_id} does not exist")))?;
            if Some(term.academic_year_id) != req.current_academic_year_id {
                return Err(ServiceError::validation(
                    "Current term must belong to the current academic year",
                ));
            }
        }

        let changes = SettingsChanges {
            school_name: Some(req.school_name),
            current_academic_year_id: Some(req.current_academic_year_id),
            current_term_id: Some(req.current_term_id),
            maintenance_mode: Some(req.maintenance_mode),
            min_password_length: Some(req.min_password_length),
        };
        let settings = school_settings::Model::apply(db, changes, admin_id).await?;

        info!(
            admin_id,
            maintenance_mode = settings.maintenance_mode,
            "Updated school settings"
        );
        Ok(settings)
    }
}
