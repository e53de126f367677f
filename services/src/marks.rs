//! # Marks Service
//!
//! The marks-entry workflow for teachers:
//!
//! - [`MarksService::save_marks`] grades and stores a batch of marks, then re-ranks
//!   every assessment the batch belongs to. The whole batch is one transaction.
//! - [`MarksService::rank_assessment`] recomputes the persisted ranks of one
//!   assessment with [`RankByAssessmentMarks`].
//! - [`MarksService::load_marks_data`] builds the marks sheet: pupils, subjects,
//!   existing marks and an aggregate ranking computed on the fly with
//!   [`RankByAggregatePoints`]. Nothing is written.
//! - [`MarksService::calculate_grades`] previews grades for a set of marks without
//!   storing anything.
//! - [`MarksService::pupil_profiles`], [`MarksService::pupil_details`] and
//!   [`MarksService::academic_history`] are read-only views over the pupils placed
//!   in the teacher's assigned class streams. Any other pupil is reported as not
//!   found.
//!
//! A mark counts as absent when it is `null` or an empty string. A numeric `0` is a
//! real mark. Any other value must parse to a percentage in `0..=100`, otherwise
//! the whole request is rejected before anything is written.

use crate::error::{ServiceError, ServiceResult};
use chrono::{NaiveDate, Utc};
use db::models::{
    assessment_record::{self, DEFAULT_TOTAL_MARKS, RecordDetails, RecordScope},
    assessment_result::{self, GradedMark},
    pupil, school_class, stream, subject,
    teacher_assignment::{self, AssignmentScope, assigned_subjects, resolve_scope},
    term,
};
use grading::{
    AggregateEntry, MarkEntry, RankByAggregatePoints, RankByAssessmentMarks, RankingPolicy,
    division, performance_remark,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Division label shown when a pupil has no graded subjects.
pub const NO_DIVISION: &str = "--";

// --- Requests ---

#[derive(Debug, Clone, Deserialize)]
pub struct SaveMarks {
    pub academic_year_id: i64,
    pub term_id: i64,
    pub exam_type: String,
    #[serde(default)]
    pub marks_data: Vec<SubjectMarks>,
}

/// Marks for one subject. `class_id`/`stream_id` pick one of several assignments
/// for the same subject; without them the earliest assignment is used.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectMarks {
    pub subject_id: i64,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub stream_id: Option<i64>,
    #[serde(default)]
    pub pupil_marks: Vec<PupilMark>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PupilMark {
    pub pupil_id: i64,
    /// Number, numeric string, empty string or `null`.
    #[serde(default)]
    pub marks_obtained: Value,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadMarks {
    pub academic_year_id: i64,
    pub term_id: i64,
    pub exam_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculateGrades {
    pub pupil_id: i64,
    /// Subject id (as a JSON object key) → percentage.
    #[serde(default)]
    pub subject_marks: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PupilSearch {
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AcademicHistoryQuery {
    pub pupil_id: i64,
    #[serde(default)]
    pub academic_year_id: Option<i64>,
    #[serde(default)]
    pub term_id: Option<i64>,
}

// --- Responses ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub saved_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetPupil {
    pub id: i64,
    pub admission_number: String,
    pub first_name: String,
    pub last_name: String,
    pub class_id: Option<i64>,
    pub stream_id: Option<i64>,
    pub class_name: String,
    pub stream_name: String,
    pub total_points: u32,
    pub subject_count: usize,
    pub division: String,
    pub stream_position: String,
    pub stream_total: usize,
    pub class_position: String,
    pub class_total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetSubject {
    pub id: i64,
    pub name: String,
    pub can_edit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistingMark {
    pub marks_obtained: f64,
    pub grade: String,
    pub points: i32,
    pub remarks: Option<String>,
    pub stream_rank: Option<i32>,
    pub class_rank: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarksSheet {
    pub pupils: Vec<SheetPupil>,
    pub subjects: Vec<SheetSubject>,
    /// Keyed by `"<pupil_id>_<subject_id>"`.
    pub existing_marks: BTreeMap<String, ExistingMark>,
    pub stream_totals: BTreeMap<String, usize>,
    pub class_totals: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradePreview {
    pub subject_grades: BTreeMap<i64, String>,
    pub subject_points: BTreeMap<i64, u8>,
    pub total_aggregate: u32,
    pub overall_division: String,
    pub remarks: String,
}

/// Shown as the class of a pupil without a placement.
pub const UNASSIGNED_CLASS: &str = "Not Assigned";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PupilProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub admission_number: String,
    pub current_class: String,
    pub current_stream: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PupilProfiles {
    pub pupils: Vec<PupilProfile>,
    pub total_pupils: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PupilDetailsView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub admission_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub nationality: Option<String>,
    pub current_class: String,
    pub current_stream: Option<String>,
    pub enrollment_date: NaiveDate,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub parent_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Result id.
    pub id: i64,
    pub subject: String,
    pub title: String,
    pub score: f64,
    pub total_marks: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub total_assessments: usize,
    /// Mean of score as a percentage of total marks, to one decimal. `None` without
    /// assessments.
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcademicHistory {
    pub pupil: PupilProfile,
    pub assessments: Vec<HistoryEntry>,
    pub stats: HistoryStats,
}

// --- Pure helpers ---

/// Reads a submitted mark. `Ok(None)` means no mark was entered.
///
/// Range is not checked here; grading rejects out-of-range values.
pub fn parse_mark(value: &Value) -> ServiceResult<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| ServiceError::validation(format!("Invalid mark: {n}"))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ServiceError::validation(format!("Invalid mark: '{s}'"))),
        other => Err(ServiceError::validation(format!("Invalid mark: {other}"))),
    }
}

fn grade_mark(pupil_id: i64, marks: f64, remarks: Option<String>) -> ServiceResult<GradedMark> {
    let grade = grading::grade(marks)?;
    Ok(GradedMark {
        pupil_id,
        marks_obtained: marks,
        grade: grade.label(),
        points: i32::from(grade.points()),
        remarks: remarks
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
    })
}

fn require_exam_type(exam_type: &str) -> ServiceResult<String> {
    let exam_type = exam_type.trim();
    if exam_type.is_empty() {
        return Err(ServiceError::validation("exam_type is required"));
    }
    Ok(exam_type.to_string())
}

fn division_label(total_points: u32, subject_count: usize) -> String {
    if subject_count == 0 {
        NO_DIVISION.to_string()
    } else {
        division(total_points).label().to_string()
    }
}

/// A subject block that survived the assignment check, with its marks graded.
#[derive(Debug, Clone)]
struct PlannedSubject {
    scope: AssignmentScope,
    marks: Vec<GradedMark>,
}

/// Resolves every subject block against the teacher's assignments and grades its
/// marks. Unassigned blocks are dropped; any invalid mark fails the whole plan.
fn plan_save(
    scopes: &[AssignmentScope],
    blocks: Vec<SubjectMarks>,
) -> ServiceResult<Vec<PlannedSubject>> {
    let mut plan = Vec::with_capacity(blocks.len());

    for block in blocks {
        let Some(scope) = resolve_scope(scopes, block.subject_id, block.class_id, block.stream_id)
        else {
            debug!(subject_id = block.subject_id, "Skipping subject not assigned to teacher");
            continue;
        };

        let mut marks = Vec::with_capacity(block.pupil_marks.len());
        for entry in block.pupil_marks {
            if let Some(value) = parse_mark(&entry.marks_obtained)? {
                marks.push(grade_mark(entry.pupil_id, value, entry.remarks)?);
            }
        }

        plan.push(PlannedSubject { scope, marks });
    }

    Ok(plan)
}

async fn ensure_term_in_year<C: ConnectionTrait>(
    conn: &C,
    term_id: i64,
    academic_year_id: i64,
) -> ServiceResult<term::Model> {
    let term = term::Model::get_by_id(conn, term_id)
        .await?
        .ok_or_else(|| ServiceError::validation(format!("Term {term_id} does not exist")))?;

    if term.academic_year_id != academic_year_id {
        return Err(ServiceError::validation(format!(
            "Term {term_id} does not belong to academic year {academic_year_id}"
        )));
    }

    Ok(term)
}

/// Averages `score / total_marks` as a percentage over entries with a positive
/// total, rounded to one decimal.
pub fn history_stats(entries: &[HistoryEntry]) -> HistoryStats {
    let percentages: Vec<f64> = entries
        .iter()
        .filter(|e| e.total_marks > 0.0)
        .map(|e| e.score / e.total_marks * 100.0)
        .collect();

    let average_score = (!percentages.is_empty()).then(|| {
        let mean = percentages.iter().sum::<f64>() / percentages.len() as f64;
        (mean * 10.0).round() / 10.0
    });

    HistoryStats {
        total_assessments: entries.len(),
        average_score,
    }
}

fn matches_search(p: &pupil::Model, needle: &str) -> bool {
    [&p.first_name, &p.last_name, &p.admission_number]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Lookup tables for class and stream names.
struct PlacementNames {
    classes: HashMap<i64, String>,
    streams: HashMap<i64, String>,
}

impl PlacementNames {
    async fn load(db: &DatabaseConnection) -> ServiceResult<Self> {
        let classes = school_class::Model::all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let streams = stream::Model::all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();
        Ok(Self { classes, streams })
    }

    fn class(&self, id: Option<i64>) -> Option<String> {
        id.and_then(|id| self.classes.get(&id).cloned())
    }

    fn stream(&self, id: Option<i64>) -> Option<String> {
        id.and_then(|id| self.streams.get(&id).cloned())
    }

    fn profile(&self, p: &pupil::Model) -> PupilProfile {
        PupilProfile {
            id: p.id,
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            admission_number: p.admission_number.clone(),
            current_class: self
                .class(p.current_class_id)
                .unwrap_or_else(|| UNASSIGNED_CLASS.to_string()),
            current_stream: self.stream(p.current_stream_id),
        }
    }
}

/// Pupils placed in the class streams the teacher is assigned to.
async fn teacher_pupils(
    db: &DatabaseConnection,
    scopes: &[AssignmentScope],
) -> ServiceResult<Vec<pupil::Model>> {
    let mut pairs: Vec<(i64, i64)> = scopes.iter().map(|s| (s.class_id, s.stream_id)).collect();
    pairs.sort_unstable();
    pairs.dedup();
    Ok(pupil::Model::in_class_streams(db, &pairs).await?)
}

/// One of the teacher's pupils, or `NotFound` for anyone else.
async fn owned_pupil(
    db: &DatabaseConnection,
    teacher_id: i64,
    pupil_id: i64,
) -> ServiceResult<pupil::Model> {
    let scopes = teacher_assignment::Model::scopes_for_teacher(db, teacher_id).await?;
    teacher_pupils(db, &scopes)
        .await?
        .into_iter()
        .find(|p| p.id == pupil_id)
        .ok_or_else(|| ServiceError::not_found("Pupil not found or not assigned to you"))
}

pub struct MarksService;

impl MarksService {
    /// Grades and stores marks for one term and exam type.
    ///
    /// Validation happens before the transaction opens. Inside it, each assigned
    /// subject gets its assessment record (created if needed), every present mark
    /// is upserted, and all of the teacher's records for this term and exam type
    /// are re-ranked. Any failure rolls the whole batch back.
    pub async fn save_marks(
        db: &DatabaseConnection,
        teacher_id: i64,
        req: SaveMarks,
    ) -> ServiceResult<SaveOutcome> {
        let exam_type = require_exam_type(&req.exam_type)?;
        ensure_term_in_year(db, req.term_id, req.academic_year_id).await?;

        let scopes = teacher_assignment::Model::scopes_for_teacher(db, teacher_id).await?;
        let plan = plan_save(&scopes, req.marks_data)?;

        let pupil_ids: Vec<i64> = plan
            .iter()
            .flat_map(|p| p.marks.iter().map(|m| m.pupil_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let known = pupil::Model::existing_ids(db, &pupil_ids).await?;
        if let Some(missing) = pupil_ids.iter().find(|id| !known.contains(id)) {
            return Err(ServiceError::validation(format!("Pupil {missing} does not exist")));
        }

        let saved_count = Self::persist_plan(db, teacher_id, req.term_id, &exam_type, &plan).await?;
        Ok(SaveOutcome { saved_count })
    }

    /// Writes a validated plan in one transaction and re-ranks the teacher's
    /// records for the term and exam type. Rolls back on any error.
    async fn persist_plan(
        db: &DatabaseConnection,
        teacher_id: i64,
        term_id: i64,
        exam_type: &str,
        plan: &[PlannedSubject],
    ) -> ServiceResult<usize> {
        let subject_names: HashMap<i64, String> = subject::Model::all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let txn = db.begin().await?;
        match Self::write_plan(&txn, teacher_id, term_id, exam_type, plan, &subject_names).await {
            Ok((saved_count, ranked_records)) => {
                txn.commit().await?;
                info!(
                    teacher_id,
                    term_id,
                    exam_type = %exam_type,
                    saved_count,
                    ranked_records,
                    "Saved marks"
                );
                Ok(saved_count)
            }
            Err(err) => {
                warn!(teacher_id, term_id, error = %err, "Rolling back marks batch");
                txn.rollback().await?;
                Err(err)
            }
        }
    }

    /// Returns the number of stored marks and of re-ranked records.
    async fn write_plan<C: ConnectionTrait>(
        conn: &C,
        teacher_id: i64,
        term_id: i64,
        exam_type: &str,
        plan: &[PlannedSubject],
        subject_names: &HashMap<i64, String>,
    ) -> ServiceResult<(usize, usize)> {
        let today = Utc::now().date_naive();
        let mut saved_count = 0;

        for planned in plan {
            let subject_id = planned.scope.subject_id;
            let scope = RecordScope {
                teacher_id,
                subject_id,
                class_id: planned.scope.class_id,
                stream_id: Some(planned.scope.stream_id),
                term_id,
                assessment_type: exam_type.to_string(),
            };
            let subject_name = subject_names.get(&subject_id).map_or("Subject", String::as_str);
            let details = RecordDetails {
                title: format!("{exam_type} - {subject_name}"),
                description: None,
                total_marks: DEFAULT_TOTAL_MARKS,
                assessment_date: today,
            };

            let record = assessment_record::Model::find_or_create(conn, &scope, &details).await?;
            for mark in &planned.marks {
                assessment_result::Model::upsert(conn, record.id, mark).await?;
                saved_count += 1;
            }
        }

        let records = assessment_record::Model::matching(conn, teacher_id, term_id, exam_type).await?;
        for record in &records {
            Self::rank_assessment(conn, record.id).await?;
        }

        Ok((saved_count, records.len()))
    }

    /// Rewrites the ranks of one assessment's results. Returns how many results
    /// were ranked; an assessment without results is left alone.
    pub async fn rank_assessment<C: ConnectionTrait>(
        conn: &C,
        assessment_record_id: i64,
    ) -> ServiceResult<usize> {
        let results = assessment_result::Model::for_record(conn, assessment_record_id).await?;
        if results.is_empty() {
            return Ok(0);
        }

        let entries: Vec<MarkEntry> = results
            .iter()
            .map(|r| MarkEntry {
                pupil_id: r.pupil_id,
                marks: r.marks_obtained,
            })
            .collect();
        let result_ids: HashMap<i64, i64> = results.iter().map(|r| (r.pupil_id, r.id)).collect();

        let ranking = RankByAssessmentMarks::rank(&entries);
        for (pupil_id, position) in &ranking {
            if let Some(result_id) = result_ids.get(pupil_id) {
                let rank = i32::try_from(*position).unwrap_or(i32::MAX);
                assessment_result::Model::set_rank(conn, *result_id, rank).await?;
            }
        }

        debug!(
            assessment_record_id,
            policy = RankByAssessmentMarks::NAME,
            ranked = ranking.len(),
            "Ranked assessment"
        );

        Ok(ranking.len())
    }

    /// Re-ranks one of the teacher's own assessments in its own transaction.
    pub async fn rank_owned_assessment(
        db: &DatabaseConnection,
        teacher_id: i64,
        assessment_record_id: i64,
    ) -> ServiceResult<usize> {
        let record = assessment_record::Model::get_by_id(db, assessment_record_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Assessment record not found"))?;

        if record.teacher_id != teacher_id {
            return Err(ServiceError::Forbidden(
                "Assessment record belongs to another teacher".into(),
            ));
        }

        let txn = db.begin().await?;
        let ranked = Self::rank_assessment(&txn, record.id).await?;
        txn.commit().await?;

        Ok(ranked)
    }

    /// Builds the marks sheet for one term and exam type.
    pub async fn load_marks_data(
        db: &DatabaseConnection,
        teacher_id: i64,
        req: LoadMarks,
    ) -> ServiceResult<MarksSheet> {
        let exam_type = require_exam_type(&req.exam_type)?;
        ensure_term_in_year(db, req.term_id, req.academic_year_id).await?;

        let scopes = teacher_assignment::Model::scopes_for_teacher(db, teacher_id).await?;
        let assigned = assigned_subjects(&scopes);

        let pupils = teacher_pupils(db, &scopes).await?;
        let names = PlacementNames::load(db).await?;

        let subjects: Vec<SheetSubject> = subject::Model::all(db)
            .await?
            .into_iter()
            .map(|s| SheetSubject {
                can_edit: assigned.contains(&s.id),
                id: s.id,
                name: s.name,
            })
            .collect();

        let records =
            assessment_record::Model::matching(db, teacher_id, req.term_id, &exam_type).await?;
        let record_subjects: HashMap<i64, i64> =
            records.iter().map(|r| (r.id, r.subject_id)).collect();
        let record_ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let results = assessment_result::Model::for_records(db, &record_ids).await?;

        let mut existing_marks = BTreeMap::new();
        // pupil → subject → points
        let mut points_by_pupil: HashMap<i64, HashMap<i64, u32>> = HashMap::new();

        for result in results {
            let Some(&subject_id) = record_subjects.get(&result.assessment_record_id) else {
                continue;
            };
            points_by_pupil
                .entry(result.pupil_id)
                .or_default()
                .insert(subject_id, u32::try_from(result.points).unwrap_or(0));
            existing_marks.insert(
                format!("{}_{}", result.pupil_id, subject_id),
                ExistingMark {
                    marks_obtained: result.marks_obtained,
                    grade: result.grade,
                    points: result.points,
                    remarks: result.remarks,
                    stream_rank: result.stream_rank,
                    class_rank: result.class_rank,
                },
            );
        }

        let entries: Vec<AggregateEntry> = pupils
            .iter()
            .map(|p| AggregateEntry {
                pupil_id: p.id,
                class_name: names.class(p.current_class_id).unwrap_or_default(),
                stream_name: names.stream(p.current_stream_id).unwrap_or_default(),
                total_points: points_by_pupil
                    .get(&p.id)
                    .map_or(0, |subjects| subjects.values().sum()),
            })
            .collect();
        let ranking = RankByAggregatePoints::rank(&entries);

        let sheet_pupils: Vec<SheetPupil> = pupils
            .into_iter()
            .zip(entries)
            .map(|(p, entry)| {
                let subject_count = points_by_pupil.get(&p.id).map_or(0, HashMap::len);
                let standing = ranking.standings.get(&p.id);
                SheetPupil {
                    id: p.id,
                    admission_number: p.admission_number,
                    first_name: p.first_name,
                    last_name: p.last_name,
                    class_id: p.current_class_id,
                    stream_id: p.current_stream_id,
                    division: division_label(entry.total_points, subject_count),
                    class_name: entry.class_name,
                    stream_name: entry.stream_name,
                    total_points: entry.total_points,
                    subject_count,
                    stream_position: standing.map(|s| s.stream.ordinal.clone()).unwrap_or_default(),
                    stream_total: standing.map_or(0, |s| s.stream.group_size),
                    class_position: standing.map(|s| s.class.ordinal.clone()).unwrap_or_default(),
                    class_total: standing.map_or(0, |s| s.class.group_size),
                }
            })
            .collect();

        debug!(
            teacher_id,
            policy = RankByAggregatePoints::NAME,
            pupils = sheet_pupils.len(),
            "Loaded marks sheet"
        );

        Ok(MarksSheet {
            pupils: sheet_pupils,
            subjects,
            existing_marks,
            stream_totals: ranking.stream_totals,
            class_totals: ranking.class_totals,
        })
    }

    /// Grades a set of marks for one pupil without storing anything. Only subjects
    /// the teacher is assigned to contribute.
    pub async fn calculate_grades(
        db: &DatabaseConnection,
        teacher_id: i64,
        req: CalculateGrades,
    ) -> ServiceResult<GradePreview> {
        if pupil::Model::get_by_id(db, req.pupil_id).await?.is_none() {
            return Err(ServiceError::not_found("Pupil not found"));
        }

        let scopes = teacher_assignment::Model::scopes_for_teacher(db, teacher_id).await?;
        let assigned = assigned_subjects(&scopes);

        let mut subject_grades = BTreeMap::new();
        let mut subject_points = BTreeMap::new();

        for (key, value) in &req.subject_marks {
            let subject_id: i64 = key
                .trim()
                .parse()
                .map_err(|_| ServiceError::validation(format!("Invalid subject id '{key}'")))?;
            if !assigned.contains(&subject_id) {
                continue;
            }
            let Some(marks) = parse_mark(value)? else {
                continue;
            };

            let grade = grading::grade(marks)?;
            subject_grades.insert(subject_id, grade.label());
            subject_points.insert(subject_id, grade.points());
        }

        let total_aggregate: u32 = subject_points.values().map(|p| u32::from(*p)).sum();
        let subject_count = subject_points.len();

        Ok(GradePreview {
            overall_division: division_label(total_aggregate, subject_count),
            remarks: performance_remark(total_aggregate, subject_count).to_string(),
            subject_grades,
            subject_points,
            total_aggregate,
        })
    }

    /// The teacher's pupils, optionally narrowed by a case-insensitive match on
    /// first name, last name or admission number.
    pub async fn pupil_profiles(
        db: &DatabaseConnection,
        teacher_id: i64,
        query: PupilSearch,
    ) -> ServiceResult<PupilProfiles> {
        let scopes = teacher_assignment::Model::scopes_for_teacher(db, teacher_id).await?;
        let names = PlacementNames::load(db).await?;
        let needle = query
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let pupils: Vec<PupilProfile> = teacher_pupils(db, &scopes)
            .await?
            .iter()
            .filter(|p| needle.as_deref().is_none_or(|n| matches_search(p, n)))
            .map(|p| names.profile(p))
            .collect();

        Ok(PupilProfiles {
            total_pupils: pupils.len(),
            pupils,
        })
    }

    pub async fn pupil_details(
        db: &DatabaseConnection,
        teacher_id: i64,
        pupil_id: i64,
    ) -> ServiceResult<PupilDetailsView> {
        let p = owned_pupil(db, teacher_id, pupil_id).await?;
        let names = PlacementNames::load(db).await?;

        Ok(PupilDetailsView {
            current_class: names
                .class(p.current_class_id)
                .unwrap_or_else(|| UNASSIGNED_CLASS.to_string()),
            current_stream: names.stream(p.current_stream_id),
            id: p.id,
            first_name: p.first_name,
            last_name: p.last_name,
            admission_number: p.admission_number,
            date_of_birth: p.date_of_birth,
            gender: p.gender,
            nationality: p.nationality,
            enrollment_date: p.enrollment_date,
            phone_number: p.phone_number,
            email: p.email,
            address: p.address,
            parent_name: p.parent_name,
            parent_phone: p.parent_phone,
            parent_email: p.parent_email,
        })
    }

    /// A pupil's results across all terms, oldest first. `academic_year_id` keeps
    /// results whose term belongs to that year; `term_id` keeps one term. Results
    /// from every teacher are included.
    pub async fn academic_history(
        db: &DatabaseConnection,
        teacher_id: i64,
        query: AcademicHistoryQuery,
    ) -> ServiceResult<AcademicHistory> {
        let p = owned_pupil(db, teacher_id, query.pupil_id).await?;
        let names = PlacementNames::load(db).await?;

        let year_terms: Option<HashSet<i64>> = match query.academic_year_id {
            Some(year_id) => Some(
                term::Model::for_year(db, year_id)
                    .await?
                    .into_iter()
                    .map(|t| t.id)
                    .collect(),
            ),
            None => None,
        };
        let subject_names: HashMap<i64, String> = subject::Model::all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let assessments: Vec<HistoryEntry> =
            assessment_result::Model::history_for_pupil(db, p.id)
                .await?
                .into_iter()
                .filter(|(_, record)| {
                    year_terms.as_ref().is_none_or(|terms| terms.contains(&record.term_id))
                        && query.term_id.is_none_or(|term_id| record.term_id == term_id)
                })
                .map(|(result, record)| HistoryEntry {
                    id: result.id,
                    subject: subject_names
                        .get(&record.subject_id)
                        .cloned()
                        .unwrap_or_default(),
                    title: record.title,
                    score: result.marks_obtained,
                    total_marks: record.total_marks,
                    date: record.assessment_date,
                })
                .collect();

        debug!(
            teacher_id,
            pupil_id = p.id,
            assessments = assessments.len(),
            "Loaded academic history"
        );

        Ok(AcademicHistory {
            pupil: names.profile(&p),
            stats: history_stats(&assessments),
            assessments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scope(assignment_id: i64, subject_id: i64) -> AssignmentScope {
        AssignmentScope {
            assignment_id,
            subject_id,
            class_stream_id: 1,
            class_id: 1,
            stream_id: 1,
        }
    }

    fn block(subject_id: i64, marks: Vec<(i64, Value)>) -> SubjectMarks {
        SubjectMarks {
            subject_id,
            class_id: None,
            stream_id: None,
            pupil_marks: marks
                .into_iter()
                .map(|(pupil_id, marks_obtained)| PupilMark {
                    pupil_id,
                    marks_obtained,
                    remarks: None,
                })
                .collect(),
        }
    }

    #[test]
    fn parse_mark_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_mark(&json!(85)).unwrap(), Some(85.0));
        assert_eq!(parse_mark(&json!("72.5")).unwrap(), Some(72.5));
        assert_eq!(parse_mark(&json!(0)).unwrap(), Some(0.0));
    }

    #[test]
    fn parse_mark_treats_null_and_blank_as_absent() {
        assert_eq!(parse_mark(&Value::Null).unwrap(), None);
        assert_eq!(parse_mark(&json!("  ")).unwrap(), None);
    }

    #[test]
    fn parse_mark_rejects_garbage() {
        assert!(matches!(
            parse_mark(&json!("abc")),
            Err(ServiceError::Validation(_))
        ));
        assert!(parse_mark(&json!(true)).is_err());
    }

    #[test]
    fn plan_skips_unassigned_subjects_and_absent_marks() {
        let scopes = [scope(1, 10)];
        let plan = plan_save(
            &scopes,
            vec![
                block(10, vec![(1, json!(85)), (2, Value::Null), (3, json!(""))]),
                block(99, vec![(1, json!(50))]),
            ],
        )
        .unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].marks.len(), 1);
        assert_eq!(plan[0].marks[0].grade, "1");
        assert_eq!(plan[0].marks[0].points, 1);
    }

    #[test]
    fn plan_fails_on_out_of_range_mark() {
        let scopes = [scope(1, 10)];
        let result = plan_save(&scopes, vec![block(10, vec![(1, json!(85)), (2, json!(140))])]);
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn zero_is_a_real_mark() {
        let scopes = [scope(1, 10)];
        let plan = plan_save(&scopes, vec![block(10, vec![(1, json!(0))])]).unwrap();
        assert_eq!(plan[0].marks[0].points, 9);
    }

    fn entry(score: f64, total_marks: f64) -> HistoryEntry {
        HistoryEntry {
            id: 1,
            subject: "Mathematics".into(),
            title: "Mid-term".into(),
            score,
            total_marks,
            date: chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        }
    }

    #[test]
    fn history_average_is_a_percentage_of_total_marks() {
        let stats = history_stats(&[entry(40.0, 50.0), entry(70.0, 100.0), entry(2.0, 3.0)]);
        assert_eq!(stats.total_assessments, 3);
        // (80 + 70 + 66.67) / 3 = 72.22
        assert_eq!(stats.average_score, Some(72.2));
    }

    #[test]
    fn history_without_assessments_has_no_average() {
        let stats = history_stats(&[]);
        assert_eq!(stats.total_assessments, 0);
        assert_eq!(stats.average_score, None);
    }

    #[test]
    fn history_average_skips_zero_totals() {
        let stats = history_stats(&[entry(5.0, 0.0), entry(45.0, 50.0)]);
        assert_eq!(stats.total_assessments, 2);
        assert_eq!(stats.average_score, Some(90.0));
    }

    #[tokio::test]
    async fn failed_write_rolls_back_records_written_earlier_in_the_batch() {
        use chrono::NaiveDate;
        use db::models::{academic_year, class_stream, user};
        use db::test_utils::setup_test_db;
        use sea_orm::{EntityTrait, PaginatorTrait};

        let db = setup_test_db().await;
        let teacher = user::Model::create(&db, "t", "t@school.test", "password123", user::UserRole::Teacher)
            .await
            .unwrap();
        let class = school_class::Model::create(&db, "P3").await.unwrap();
        let stream = stream::Model::create(&db, "Blue").await.unwrap();
        let pairing = class_stream::Model::pair(&db, class.id, stream.id).await.unwrap();
        let math = subject::Model::create(&db, "Mathematics").await.unwrap();
        let english = subject::Model::create(&db, "English").await.unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let year = academic_year::Model::create(&db, "2026", start, end).await.unwrap();
        let term = term::Model::create(&db, "Term 1", year.id, start, end, None).await.unwrap();
        let pupil = pupil::Model::register(
            &db,
            pupil::PupilDetails {
                first_name: "Akello".into(),
                last_name: "Joy".into(),
                date_of_birth: NaiveDate::from_ymd_opt(2018, 2, 3).unwrap(),
                gender: "female".into(),
                address: None,
                nationality: None,
                phone_number: None,
                email: None,
                parent_name: None,
                parent_phone: None,
                parent_email: None,
                emergency_contact_name: None,
                emergency_contact_phone: None,
                current_class_id: Some(class.id),
                current_stream_id: Some(stream.id),
            },
        )
        .await
        .unwrap();

        let scope_for = |subject_id| AssignmentScope {
            assignment_id: 1,
            subject_id,
            class_stream_id: pairing.id,
            class_id: class.id,
            stream_id: stream.id,
        };
        // The second subject references a pupil that does not exist, so its
        // result insert fails on the foreign key after Mathematics is written.
        let plan = vec![
            PlannedSubject {
                scope: scope_for(math.id),
                marks: vec![grade_mark(pupil.id, 70.0, None).unwrap()],
            },
            PlannedSubject {
                scope: scope_for(english.id),
                marks: vec![grade_mark(pupil.id + 1000, 55.0, None).unwrap()],
            },
        ];

        let result = MarksService::persist_plan(&db, teacher.id, term.id, "Mid-term", &plan).await;
        assert!(result.is_err());

        assert_eq!(assessment_record::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(assessment_result::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[test]
    fn division_label_without_subjects() {
        assert_eq!(division_label(0, 0), NO_DIVISION);
        assert_eq!(division_label(5, 4), "Division 1");
    }
}
