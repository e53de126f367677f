use crate::error::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use db::models::{
    assessment_record::{self, RecordDetails, RecordScope},
    school_settings,
    teacher_assignment::{self, resolve_scope},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssessmentRecord {
    pub subject_id: i64,
    pub class_id: i64,
    #[serde(default)]
    pub stream_id: Option<i64>,
    #[validate(length(min = 1, message = "assessment_type is required"))]
    pub assessment_type: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0, max = 1000.0, message = "total_marks must be positive"))]
    pub total_marks: f64,
    pub assessment_date: NaiveDate,
}

pub struct AssessmentRecordService;

impl AssessmentRecordService {
    /// The teacher's records for `term_id`, or for the current term when none is
    /// given. Empty when neither is available.
    pub async fn list(
        db: &DatabaseConnection,
        teacher_id: i64,
        term_id: Option<i64>,
    ) -> ServiceResult<Vec<assessment_record::Model>> {
        let term_id = match term_id {
            Some(id) => Some(id),
            None => school_settings::Model::get_or_init(db).await?.current_term_id,
        };

        match term_id {
            Some(term_id) => Ok(assessment_record::Model::for_teacher(db, teacher_id, term_id).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Creates a record in the current term for a subject and class the teacher is
    /// assigned to.
    pub async fn create(
        db: &DatabaseConnection,
        teacher_id: i64,
        req: CreateAssessmentRecord,
    ) -> ServiceResult<assessment_record::Model> {
        let settings = school_settings::Model::get_or_init(db).await?;
        let term_id = settings
            .current_term_id
            .ok_or_else(|| ServiceError::validation("No current term is set"))?;

        let scopes = teacher_assignment::Model::scopes_for_teacher(db, teacher_id).await?;
        if resolve_scope(&scopes, req.subject_id, Some(req.class_id), req.stream_id).is_none() {
            return Err(ServiceError::Forbidden(
                "You are not assigned to this subject and class".into(),
            ));
        }

        let scope = RecordScope {
            teacher_id,
            subject_id: req.subject_id,
            class_id: req.class_id,
            stream_id: req.stream_id,
            term_id,
            assessment_type: req.assessment_type.trim().to_string(),
        };
        let details = RecordDetails {
            title: req.title.trim().to_string(),
            description: req.description.filter(|d| !d.trim().is_empty()),
            total_marks: req.total_marks,
            assessment_date: req.assessment_date,
        };

        let record = assessment_record::Model::create_unique(db, &scope, &details)
            .await?
            .ok_or_else(|| {
                ServiceError::Conflict("An assessment of this type already exists".into())
            })?;

        info!(teacher_id, record_id = record.id, "Created assessment record");
        Ok(record)
    }
}
