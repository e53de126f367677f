//! Reference data managed by administrators: classes, streams, subjects, their
//! pairings, teacher assignments, academic years, terms and exam schedules.

use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, NaiveDate, Utc};
use db::models::{
    academic_year, class_stream, exam_schedule, school_class, stream, subject,
    teacher_assignment, term,
    user::{self, UserRole},
};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::Display;
use tracing::info;
use validator::Validate;

/// The three name-only lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NamedKind {
    Class,
    Stream,
    Subject,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedItem {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<school_class::Model> for NamedItem {
    fn from(m: school_class::Model) -> Self {
        Self { id: m.id, name: m.name, created_at: m.created_at }
    }
}

impl From<stream::Model> for NamedItem {
    fn from(m: stream::Model) -> Self {
        Self { id: m.id, name: m.name, created_at: m.created_at }
    }
}

impl From<subject::Model> for NamedItem {
    fn from(m: subject::Model) -> Self {
        Self { id: m.id, name: m.name, created_at: m.created_at }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NameRequest {
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassStreamRequest {
    pub class_id: i64,
    pub stream_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignment {
    pub teacher_id: i64,
    pub class_id: i64,
    pub stream_id: i64,
    pub subject_id: i64,
}

/// An assignment with the names a listing needs.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentView {
    pub id: i64,
    pub teacher_id: i64,
    pub teacher_name: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub class_id: i64,
    pub class_name: String,
    pub stream_id: i64,
    pub stream_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AcademicYearRequest {
    #[validate(length(min = 1, max = 50, message = "name is required"))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TermRequest {
    #[validate(length(min = 1, max = 50, message = "name is required"))]
    pub name: String,
    pub academic_year_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    #[validate(range(min = 0, message = "days cannot be negative"))]
    pub days: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExamScheduleRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    pub term_id: i64,
    pub exam_date: NaiveDate,
    pub subject_id: i64,
    pub class_id: i64,
}

fn ensure_date_order(start: NaiveDate, end: NaiveDate) -> ServiceResult<()> {
    if end <= start {
        return Err(ServiceError::validation("end_date must be after start_date"));
    }
    Ok(())
}

pub struct ReferenceService;

impl ReferenceService {
    // --- classes, streams, subjects ---

    pub async fn list_named(db: &DatabaseConnection, kind: NamedKind) -> ServiceResult<Vec<NamedItem>> {
        let items: Vec<NamedItem> = match kind {
            NamedKind::Class => school_class::Model::all(db).await?.into_iter().map(Into::into).collect(),
            NamedKind::Stream => stream::Model::all(db).await?.into_iter().map(Into::into).collect(),
            NamedKind::Subject => subject::Model::all(db).await?.into_iter().map(Into::into).collect(),
        };
        Ok(items)
    }

    pub async fn create_named(db: &DatabaseConnection, kind: NamedKind, name: &str) -> ServiceResult<NamedItem> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("name is required"));
        }

        let created = match kind {
            NamedKind::Class => school_class::Model::create(db, name).await.map(NamedItem::from),
            NamedKind::Stream => stream::Model::create(db, name).await.map(NamedItem::from),
            NamedKind::Subject => subject::Model::create(db, name).await.map(NamedItem::from),
        }
        .map_err(|e| ServiceError::conflict_on_unique(e, format!("{kind} '{name}' already exists")))?;

        info!(kind = %kind, id = created.id, name = %created.name, "Created reference item");
        Ok(created)
    }

    pub async fn rename_named(
        db: &DatabaseConnection,
        kind: NamedKind,
        id: i64,
        name: &str,
    ) -> ServiceResult<NamedItem> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("name is required"));
        }

        match kind {
            NamedKind::Class => school_class::Model::rename(db, id, name).await.map(NamedItem::from),
            NamedKind::Stream => stream::Model::rename(db, id, name).await.map(NamedItem::from),
            NamedKind::Subject => subject::Model::rename(db, id, name).await.map(NamedItem::from),
        }
        .map_err(|e| {
            ServiceError::on_update(e, &format!("{kind} not found"), &format!("{kind} '{name}' already exists"))
        })
    }

    pub async fn delete_named(db: &DatabaseConnection, kind: NamedKind, id: i64) -> ServiceResult<()> {
        let removed = match kind {
            NamedKind::Class => school_class::Model::delete(db, id).await?,
            NamedKind::Stream => stream::Model::delete(db, id).await?,
            NamedKind::Subject => subject::Model::delete(db, id).await?,
        };
        if removed == 0 {
            return Err(ServiceError::not_found(format!("{kind} not found")));
        }
        info!(kind = %kind, id, "Deleted reference item");
        Ok(())
    }

    // --- class-stream pairings ---

    pub async fn pair_class_stream(
        db: &DatabaseConnection,
        req: ClassStreamRequest,
    ) -> ServiceResult<class_stream::Model> {
        if school_class::Entity::find_by_id(req.class_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found("Class not found"));
        }
        if stream::Entity::find_by_id(req.stream_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found("Stream not found"));
        }

        class_stream::Model::pair(db, req.class_id, req.stream_id)
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, "Stream is already part of this class"))
    }

    pub async fn unpair_class_stream(db: &DatabaseConnection, req: ClassStreamRequest) -> ServiceResult<()> {
        if class_stream::Model::unpair(db, req.class_id, req.stream_id).await? == 0 {
            return Err(ServiceError::not_found("Stream is not part of this class"));
        }
        Ok(())
    }

    pub async fn streams_for_class(db: &DatabaseConnection, class_id: i64) -> ServiceResult<Vec<NamedItem>> {
        if school_class::Entity::find_by_id(class_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found("Class not found"));
        }
        let streams = class_stream::Model::streams_for_class(db, class_id).await?;
        Ok(streams.into_iter().map(Into::into).collect())
    }

    // --- teacher assignments ---

    pub async fn assign_teacher(
        db: &DatabaseConnection,
        req: CreateAssignment,
    ) -> ServiceResult<teacher_assignment::Model> {
        let teacher = user::Model::get_by_id(db, req.teacher_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Teacher not found"))?;
        if teacher.role != UserRole::Teacher {
            return Err(ServiceError::validation(format!(
                "User '{}' is not a teacher",
                teacher.username
            )));
        }

        let pairing = class_stream::Model::find_pair(db, req.class_id, req.stream_id)
            .await?
            .ok_or_else(|| ServiceError::validation("Stream is not part of this class"))?;

        if subject::Entity::find_by_id(req.subject_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found("Subject not found"));
        }

        let assignment = teacher_assignment::Model::create(db, req.teacher_id, pairing.id, req.subject_id)
            .await
            .map_err(|e| {
                ServiceError::conflict_on_unique(e, "Teacher is already assigned to this subject and class")
            })?;

        info!(
            teacher_id = req.teacher_id,
            class_stream_id = pairing.id,
            subject_id = req.subject_id,
            "Assigned teacher"
        );
        Ok(assignment)
    }

    pub async fn list_assignments(
        db: &DatabaseConnection,
        teacher_id: Option<i64>,
    ) -> ServiceResult<Vec<AssignmentView>> {
        let assignments = teacher_assignment::Model::list(db, teacher_id).await?;

        let teachers: HashMap<i64, String> = user::Model::list(db, Some(UserRole::Teacher))
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();
        let subjects: HashMap<i64, String> =
            subject::Model::all(db).await?.into_iter().map(|s| (s.id, s.name)).collect();
        let classes: HashMap<i64, String> =
            school_class::Model::all(db).await?.into_iter().map(|c| (c.id, c.name)).collect();
        let streams: HashMap<i64, String> =
            stream::Model::all(db).await?.into_iter().map(|s| (s.id, s.name)).collect();
        let pairings: HashMap<i64, class_stream::Model> = class_stream::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|cs| (cs.id, cs))
            .collect();

        let name_of = |map: &HashMap<i64, String>, id: i64| map.get(&id).cloned().unwrap_or_default();

        Ok(assignments
            .into_iter()
            .filter_map(|a| {
                let pairing = pairings.get(&a.class_stream_id)?;
                Some(AssignmentView {
                    id: a.id,
                    teacher_id: a.teacher_id,
                    teacher_name: name_of(&teachers, a.teacher_id),
                    subject_id: a.subject_id,
                    subject_name: name_of(&subjects, a.subject_id),
                    class_id: pairing.class_id,
                    class_name: name_of(&classes, pairing.class_id),
                    stream_id: pairing.stream_id,
                    stream_name: name_of(&streams, pairing.stream_id),
                })
            })
            .collect())
    }

    pub async fn remove_assignment(db: &DatabaseConnection, id: i64) -> ServiceResult<()> {
        if teacher_assignment::Model::delete(db, id).await? == 0 {
            return Err(ServiceError::not_found("Assignment not found"));
        }
        Ok(())
    }

    // --- academic years ---

    pub async fn list_years(db: &DatabaseConnection) -> ServiceResult<Vec<academic_year::Model>> {
        Ok(academic_year::Model::all(db).await?)
    }

    pub async fn create_year(
        db: &DatabaseConnection,
        req: AcademicYearRequest,
    ) -> ServiceResult<academic_year::Model> {
        ensure_date_order(req.start_date, req.end_date)?;
        academic_year::Model::create(db, &req.name, req.start_date, req.end_date)
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, format!("Academic year '{}' already exists", req.name.trim())))
    }

    pub async fn update_year(
        db: &DatabaseConnection,
        id: i64,
        req: AcademicYearRequest,
    ) -> ServiceResult<academic_year::Model> {
        ensure_date_order(req.start_date, req.end_date)?;
        academic_year::Model::update(db, id, &req.name, req.start_date, req.end_date)
            .await
            .map_err(|e| {
                ServiceError::on_update(
                    e,
                    "Academic year not found",
                    &format!("Academic year '{}' already exists", req.name.trim()),
                )
            })
    }

    /// Deleting a year removes its terms with it.
    pub async fn delete_year(db: &DatabaseConnection, id: i64) -> ServiceResult<()> {
        if academic_year::Model::delete(db, id).await? == 0 {
            return Err(ServiceError::not_found("Academic year not found"));
        }
        Ok(())
    }

    // --- terms ---

    pub async fn list_terms(db: &DatabaseConnection, academic_year_id: Option<i64>) -> ServiceResult<Vec<term::Model>> {
        Ok(match academic_year_id {
            Some(year_id) => term::Model::for_year(db, year_id).await?,
            None => term::Model::all(db).await?,
        })
    }

    pub async fn create_term(db: &DatabaseConnection, req: TermRequest) -> ServiceResult<term::Model> {
        ensure_date_order(req.start_date, req.end_date)?;
        if academic_year::Entity::find_by_id(req.academic_year_id).one(db).await?.is_none() {
            return Err(ServiceError::validation("Academic year does not exist"));
        }

        term::Model::create(db, &req.name, req.academic_year_id, req.start_date, req.end_date, req.days)
            .await
            .map_err(|e| {
                ServiceError::conflict_on_unique(e, format!("Term '{}' already exists in this year", req.name.trim()))
            })
    }

    /// The academic year of an existing term cannot be changed.
    pub async fn update_term(db: &DatabaseConnection, id: i64, req: TermRequest) -> ServiceResult<term::Model> {
        ensure_date_order(req.start_date, req.end_date)?;
        let existing = term::Model::get_by_id(db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Term not found"))?;
        if existing.academic_year_id != req.academic_year_id {
            return Err(ServiceError::validation("A term cannot move to another academic year"));
        }

        term::Model::update(db, id, &req.name, req.start_date, req.end_date, req.days)
            .await
            .map_err(|e| {
                ServiceError::on_update(
                    e,
                    "Term not found",
                    &format!("Term '{}' already exists in this year", req.name.trim()),
                )
            })
    }

    pub async fn delete_term(db: &DatabaseConnection, id: i64) -> ServiceResult<()> {
        if term::Model::delete(db, id).await? == 0 {
            return Err(ServiceError::not_found("Term not found"));
        }
        Ok(())
    }

    // --- exam schedules ---

    pub async fn list_exams(
        db: &DatabaseConnection,
        term_id: Option<i64>,
    ) -> ServiceResult<Vec<exam_schedule::Model>> {
        Ok(exam_schedule::Model::list(db, term_id).await?)
    }

    pub async fn create_exam(
        db: &DatabaseConnection,
        req: ExamScheduleRequest,
    ) -> ServiceResult<exam_schedule::Model> {
        if term::Model::get_by_id(db, req.term_id).await?.is_none() {
            return Err(ServiceError::validation("Term does not exist"));
        }
        if subject::Entity::find_by_id(req.subject_id).one(db).await?.is_none() {
            return Err(ServiceError::validation("Subject does not exist"));
        }
        if school_class::Entity::find_by_id(req.class_id).one(db).await?.is_none() {
            return Err(ServiceError::validation("Class does not exist"));
        }

        let exam = exam_schedule::Model::create(
            db,
            &req.name,
            req.term_id,
            req.exam_date,
            req.subject_id,
            req.class_id,
        )
        .await
        .map_err(|e| ServiceError::conflict_on_unique(e, "This exam is already scheduled"))?;

        info!(exam_id = exam.id, term_id = exam.term_id, name = %exam.name, "Scheduled exam");
        Ok(exam)
    }

    pub async fn delete_exam(db: &DatabaseConnection, id: i64) -> ServiceResult<()> {
        if exam_schedule::Model::delete(db, id).await? == 0 {
            return Err(ServiceError::not_found("Exam schedule not found"));
        }
        Ok(())
    }

    pub async fn exam_types(db: &DatabaseConnection) -> ServiceResult<Vec<String>> {
        Ok(exam_schedule::Model::exam_types(db).await?)
    }
}
