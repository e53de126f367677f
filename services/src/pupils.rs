use crate::error::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use db::models::{
    class_stream, school_class,
    pupil::{self, PupilDetails, PupilFilter, PupilStatus},
};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Body of a register or update call. `status` is ignored on registration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PupilRequest {
    #[validate(length(min = 1, max = 100, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last_name is required"))]
    pub last_name: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
    #[validate(length(min = 1, max = 20, message = "gender is required"))]
    pub gender: String,
    pub address: Option<String>,
    pub nationality: Option<String>,
    pub phone_number: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    #[validate(email(message = "parent_email must be a valid address"))]
    pub parent_email: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub current_class_id: Option<i64>,
    pub current_stream_id: Option<i64>,
    pub status: Option<PupilStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PupilQuery {
    pub class_id: Option<i64>,
    pub stream_id: Option<i64>,
    pub status: Option<PupilStatus>,
    pub query: Option<String>,
}

impl From<PupilQuery> for PupilFilter {
    fn from(q: PupilQuery) -> Self {
        PupilFilter {
            class_id: q.class_id,
            stream_id: q.stream_id,
            status: q.status,
            query: q.query,
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn parse_birth_date(raw: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ServiceError::validation("date_of_birth must be a date in YYYY-MM-DD format"))
}

/// Checks the placement and turns the request into model details.
async fn into_details(db: &DatabaseConnection, req: PupilRequest) -> ServiceResult<PupilDetails> {
    let date_of_birth = parse_birth_date(&req.date_of_birth)?;

    match (req.current_class_id, req.current_stream_id) {
        (None, Some(_)) => {
            return Err(ServiceError::validation("A stream requires a class"));
        }
        (Some(class_id), None) => {
            if school_class::Entity::find_by_id(class_id).one(db).await?.is_none() {
                return Err(ServiceError::validation("Class does not exist"));
            }
        }
        (Some(class_id), Some(stream_id)) => {
            if class_stream::Model::find_pair(db, class_id, stream_id).await?.is_none() {
                return Err(ServiceError::validation("Stream is not part of this class"));
            }
        }
        (None, None) => {}
    }

    Ok(PupilDetails {
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        date_of_birth,
        gender: req.gender.trim().to_string(),
        address: blank_to_none(req.address),
        nationality: blank_to_none(req.nationality),
        phone_number: blank_to_none(req.phone_number),
        email: blank_to_none(req.email),
        parent_name: blank_to_none(req.parent_name),
        parent_phone: blank_to_none(req.parent_phone),
        parent_email: blank_to_none(req.parent_email),
        emergency_contact_name: blank_to_none(req.emergency_contact_name),
        emergency_contact_phone: blank_to_none(req.emergency_contact_phone),
        current_class_id: req.current_class_id,
        current_stream_id: req.current_stream_id,
    })
}

pub struct PupilService;

impl PupilService {
    pub async fn list(db: &DatabaseConnection, query: PupilQuery) -> ServiceResult<Vec<pupil::Model>> {
        Ok(pupil::Model::search(db, &query.into()).await?)
    }

    /// Registers a pupil under the next admission number of the current year.
    pub async fn register(db: &DatabaseConnection, req: PupilRequest) -> ServiceResult<pupil::Model> {
        let details = into_details(db, req).await?;
        let pupil = pupil::Model::register(db, details).await.map_err(|e| {
            ServiceError::conflict_on_unique(e, "Admission number already taken, please retry")
        })?;

        info!(
            pupil_id = pupil.id,
            admission_number = %pupil.admission_number,
            "Registered pupil"
        );
        Ok(pupil)
    }

    pub async fn get(db: &DatabaseConnection, id: i64) -> ServiceResult<pupil::Model> {
        pupil::Model::get_by_id(db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Pupil not found"))
    }

    pub async fn update(db: &DatabaseConnection, id: i64, req: PupilRequest) -> ServiceResult<pupil::Model> {
        let status = req.status;
        let details = into_details(db, req).await?;
        pupil::Model::update_details(db, id, details, status)
            .await
            .map_err(|e| ServiceError::on_update(e, "Pupil not found", "Pupil conflicts with an existing record"))
    }

    /// Deleting a pupil also removes their assessment results.
    pub async fn delete(db: &DatabaseConnection, id: i64) -> ServiceResult<()> {
        if pupil::Model::delete(db, id).await? == 0 {
            return Err(ServiceError::not_found("Pupil not found"));
        }
        info!(pupil_id = id, "Deleted pupil");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_date_must_be_iso() {
        assert_eq!(
            parse_birth_date("2014-03-09").unwrap(),
            NaiveDate::from_ymd_opt(2014, 3, 9).unwrap()
        );
        assert!(matches!(parse_birth_date("09/03/2014"), Err(ServiceError::Validation(_))));
        assert!(matches!(parse_birth_date("2014-02-30"), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn blank_optional_fields_become_none() {
        assert_eq!(blank_to_none(Some("   ".into())), None);
        assert_eq!(blank_to_none(Some(" Kampala ".into())), Some("Kampala".into()));
        assert_eq!(blank_to_none(None), None);
    }
}
