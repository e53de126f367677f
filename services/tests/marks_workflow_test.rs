mod helpers;

use db::models::{assessment_record, assessment_result};
use db::test_utils::setup_test_db;
use db::models::{academic_year, term};
use helpers::{add_pupil, date, seed_school};
use serde_json::{Value, json};
use services::marks::{
    AcademicHistoryQuery, CalculateGrades, LoadMarks, MarksService, PupilMark, PupilSearch,
    SaveMarks, SubjectMarks,
};
use services::ServiceError;
use std::collections::HashMap;

fn save_request(
    year_id: i64,
    term_id: i64,
    blocks: Vec<(i64, Vec<(i64, Value)>)>,
) -> SaveMarks {
    SaveMarks {
        academic_year_id: year_id,
        term_id,
        exam_type: "Mid-term".to_string(),
        marks_data: blocks
            .into_iter()
            .map(|(subject_id, marks)| SubjectMarks {
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
            })
            .collect(),
    }
}

#[tokio::test]
async fn save_marks_grades_and_ranks_end_to_end() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let p1 = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;
    let p2 = add_pupil(&db, "Brian", Some(school.class.id), Some(school.stream.id)).await;

    let req = save_request(
        school.year.id,
        school.term.id,
        vec![(school.math.id, vec![(p1.id, json!(85)), (p2.id, json!("60"))])],
    );
    let outcome = MarksService::save_marks(&db, school.teacher.id, req).await.unwrap();
    assert_eq!(outcome.saved_count, 2);

    let records = assessment_record::Model::matching(&db, school.teacher.id, school.term.id, "Mid-term")
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.class_id, school.class.id);
    assert_eq!(record.stream_id, Some(school.stream.id));
    assert_eq!(record.title, "Mid-term - Mathematics");

    let results = assessment_result::Model::for_record(&db, record.id).await.unwrap();
    let by_pupil: HashMap<i64, &assessment_result::Model> =
        results.iter().map(|r| (r.pupil_id, r)).collect();

    let first = by_pupil[&p1.id];
    assert_eq!(first.grade, "1");
    assert_eq!(first.points, 1);
    assert_eq!(first.stream_rank, Some(1));
    assert_eq!(first.class_rank, Some(1));

    let second = by_pupil[&p2.id];
    assert_eq!(second.grade, "4");
    assert_eq!(second.points, 4);
    assert_eq!(second.stream_rank, Some(2));
}

#[tokio::test]
async fn saving_the_same_marks_twice_is_idempotent() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let p1 = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;
    let p2 = add_pupil(&db, "Brian", Some(school.class.id), Some(school.stream.id)).await;

    let blocks = vec![(school.math.id, vec![(p1.id, json!(72.5)), (p2.id, json!(39))])];

    let first = MarksService::save_marks(&db, school.teacher.id, save_request(school.year.id, school.term.id, blocks.clone()))
        .await
        .unwrap();
    let second = MarksService::save_marks(&db, school.teacher.id, save_request(school.year.id, school.term.id, blocks))
        .await
        .unwrap();
    assert_eq!(first, second);

    let records = assessment_record::Model::matching(&db, school.teacher.id, school.term.id, "Mid-term")
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    let results = assessment_result::Model::for_record(&db, records[0].id).await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn resaving_updates_marks_in_place_and_reranks() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let p1 = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;
    let p2 = add_pupil(&db, "Brian", Some(school.class.id), Some(school.stream.id)).await;

    MarksService::save_marks(
        &db,
        school.teacher.id,
        save_request(school.year.id, school.term.id, vec![(school.math.id, vec![(p1.id, json!(90)), (p2.id, json!(50))])]),
    )
    .await
    .unwrap();

    // Only pupil 2 is resubmitted; pupil 1 keeps the earlier mark.
    MarksService::save_marks(
        &db,
        school.teacher.id,
        save_request(school.year.id, school.term.id, vec![(school.math.id, vec![(p2.id, json!(95))])]),
    )
    .await
    .unwrap();

    let record = &assessment_record::Model::matching(&db, school.teacher.id, school.term.id, "Mid-term")
        .await
        .unwrap()[0];
    let results = assessment_result::Model::for_record(&db, record.id).await.unwrap();
    assert_eq!(results.len(), 2);

    let by_pupil: HashMap<i64, &assessment_result::Model> =
        results.iter().map(|r| (r.pupil_id, r)).collect();
    assert_eq!(by_pupil[&p2.id].marks_obtained, 95.0);
    assert_eq!(by_pupil[&p2.id].stream_rank, Some(1));
    assert_eq!(by_pupil[&p1.id].stream_rank, Some(2));
}

#[tokio::test]
async fn invalid_mark_rejects_the_whole_batch() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let p1 = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;
    let p2 = add_pupil(&db, "Brian", Some(school.class.id), Some(school.stream.id)).await;

    let req = save_request(
        school.year.id,
        school.term.id,
        vec![(school.math.id, vec![(p1.id, json!(70)), (p2.id, json!(101))])],
    );
    let err = MarksService::save_marks(&db, school.teacher.id, req).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let records = assessment_record::Model::matching(&db, school.teacher.id, school.term.id, "Mid-term")
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn unknown_pupil_is_rejected() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;

    let req = save_request(school.year.id, school.term.id, vec![(school.math.id, vec![(9_999, json!(50))])]);
    let err = MarksService::save_marks(&db, school.teacher.id, req).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn unassigned_subjects_are_skipped() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let p1 = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;

    let req = save_request(
        school.year.id,
        school.term.id,
        vec![
            (school.english.id, vec![(p1.id, json!(80))]),
            (school.math.id, vec![(p1.id, json!(66))]),
        ],
    );
    let outcome = MarksService::save_marks(&db, school.teacher.id, req).await.unwrap();
    assert_eq!(outcome.saved_count, 1);

    let records = assessment_record::Model::matching(&db, school.teacher.id, school.term.id, "Mid-term")
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].subject_id, school.math.id);
}

#[tokio::test]
async fn blank_marks_are_absent_but_zero_counts() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let p1 = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;
    let p2 = add_pupil(&db, "Brian", Some(school.class.id), Some(school.stream.id)).await;
    let p3 = add_pupil(&db, "Carol", Some(school.class.id), Some(school.stream.id)).await;

    let req = save_request(
        school.year.id,
        school.term.id,
        vec![(school.math.id, vec![(p1.id, json!(0)), (p2.id, json!("")), (p3.id, Value::Null)])],
    );
    let outcome = MarksService::save_marks(&db, school.teacher.id, req).await.unwrap();
    assert_eq!(outcome.saved_count, 1);
}

#[tokio::test]
async fn term_from_another_year_is_rejected() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;

    let req = save_request(school.year.id + 1, school.term.id, vec![]);
    let err = MarksService::save_marks(&db, school.teacher.id, req).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn load_marks_data_ranks_aggregate_totals() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let p1 = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;
    let p2 = add_pupil(&db, "Brian", Some(school.class.id), Some(school.stream.id)).await;
    // Not in the teacher's class-stream.
    add_pupil(&db, "Dan", None, None).await;

    MarksService::save_marks(
        &db,
        school.teacher.id,
        save_request(school.year.id, school.term.id, vec![(school.math.id, vec![(p1.id, json!(85)), (p2.id, json!(30))])]),
    )
    .await
    .unwrap();

    let sheet = MarksService::load_marks_data(
        &db,
        school.teacher.id,
        LoadMarks {
            academic_year_id: school.year.id,
            term_id: school.term.id,
            exam_type: "Mid-term".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(sheet.pupils.len(), 2);
    assert_eq!(sheet.stream_totals["P5_A"], 2);
    assert_eq!(sheet.class_totals["P5"], 2);

    let key = format!("{}_{}", p1.id, school.math.id);
    assert_eq!(sheet.existing_marks[&key].grade, "1");

    // Higher total is placed first.
    let brian = sheet.pupils.iter().find(|p| p.id == p2.id).unwrap();
    assert_eq!(brian.total_points, 9);
    assert_eq!(brian.stream_position, "1st");
    assert_eq!(brian.stream_total, 2);
    let amina = sheet.pupils.iter().find(|p| p.id == p1.id).unwrap();
    assert_eq!(amina.class_position, "2nd");
    assert_eq!(amina.division, "Division 1");

    let math = sheet.subjects.iter().find(|s| s.id == school.math.id).unwrap();
    assert!(math.can_edit);
    let english = sheet.subjects.iter().find(|s| s.id == school.english.id).unwrap();
    assert!(!english.can_edit);
}

#[tokio::test]
async fn calculate_grades_previews_without_saving() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let p1 = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;

    let mut subject_marks = HashMap::new();
    subject_marks.insert(school.math.id.to_string(), json!(62));
    subject_marks.insert(school.english.id.to_string(), json!(90));

    let preview = MarksService::calculate_grades(
        &db,
        school.teacher.id,
        CalculateGrades { pupil_id: p1.id, subject_marks },
    )
    .await
    .unwrap();

    assert_eq!(preview.subject_grades.len(), 1);
    assert_eq!(preview.subject_grades[&school.math.id], "4");
    assert_eq!(preview.total_aggregate, 4);
    assert_eq!(preview.overall_division, "Division 1");

    let records = assessment_record::Model::matching(&db, school.teacher.id, school.term.id, "Mid-term")
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn calculate_grades_for_missing_pupil_is_not_found() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;

    let err = MarksService::calculate_grades(
        &db,
        school.teacher.id,
        CalculateGrades { pupil_id: 42, subject_marks: HashMap::new() },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn ranking_another_teachers_record_is_forbidden() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let other = helpers::create_user(&db, "teacher2", db::models::user::UserRole::Teacher).await;
    let p1 = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;

    MarksService::save_marks(
        &db,
        school.teacher.id,
        save_request(school.year.id, school.term.id, vec![(school.math.id, vec![(p1.id, json!(55))])]),
    )
    .await
    .unwrap();
    let record = &assessment_record::Model::matching(&db, school.teacher.id, school.term.id, "Mid-term")
        .await
        .unwrap()[0];

    let err = MarksService::rank_owned_assessment(&db, other.id, record.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let ranked = MarksService::rank_owned_assessment(&db, school.teacher.id, record.id).await.unwrap();
    assert_eq!(ranked, 1);
}

#[tokio::test]
async fn pupil_profiles_list_only_the_teachers_pupils() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let amina = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;
    let brian = add_pupil(&db, "Brian", Some(school.class.id), Some(school.stream.id)).await;
    add_pupil(&db, "Carol", None, None).await;

    let all = MarksService::pupil_profiles(&db, school.teacher.id, PupilSearch::default())
        .await
        .unwrap();
    assert_eq!(all.total_pupils, 2);
    let ids: Vec<i64> = all.pupils.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![amina.id, brian.id]);
    assert_eq!(all.pupils[0].current_class, "P5");
    assert_eq!(all.pupils[0].current_stream.as_deref(), Some("A"));

    let by_name = MarksService::pupil_profiles(
        &db,
        school.teacher.id,
        PupilSearch { search: Some("  bRi ".into()) },
    )
    .await
    .unwrap();
    assert_eq!(by_name.total_pupils, 1);
    assert_eq!(by_name.pupils[0].id, brian.id);

    let by_admission = MarksService::pupil_profiles(
        &db,
        school.teacher.id,
        PupilSearch { search: Some(amina.admission_number.to_lowercase()) },
    )
    .await
    .unwrap();
    assert_eq!(by_admission.pupils.len(), 1);
    assert_eq!(by_admission.pupils[0].id, amina.id);
}

#[tokio::test]
async fn teacher_without_assignments_sees_no_pupils() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;
    let other = helpers::create_user(&db, "teacher2", db::models::user::UserRole::Teacher).await;

    let profiles = MarksService::pupil_profiles(&db, other.id, PupilSearch::default())
        .await
        .unwrap();
    assert_eq!(profiles.total_pupils, 0);
    assert!(profiles.pupils.is_empty());
}

#[tokio::test]
async fn pupil_details_are_limited_to_the_teachers_pupils() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let amina = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;
    let carol = add_pupil(&db, "Carol", None, None).await;

    let details = MarksService::pupil_details(&db, school.teacher.id, amina.id).await.unwrap();
    assert_eq!(details.admission_number, amina.admission_number);
    assert_eq!(details.current_class, "P5");
    assert_eq!(details.date_of_birth, date(2015, 6, 1));

    let err = MarksService::pupil_details(&db, school.teacher.id, carol.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(msg) if msg == "Pupil not found or not assigned to you"));

    let err = MarksService::pupil_details(&db, school.teacher.id, 9_999).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn academic_history_spans_terms_and_filters_by_year_or_term() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let amina = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;

    let term2 = term::Model::create(&db, "Term 2", school.year.id, date(2026, 5, 20), date(2026, 8, 10), None)
        .await
        .unwrap();
    let last_year = academic_year::Model::create(&db, "2025", date(2025, 1, 1), date(2025, 12, 31))
        .await
        .unwrap();
    let old_term = term::Model::create(&db, "Term 3", last_year.id, date(2025, 9, 1), date(2025, 11, 30), None)
        .await
        .unwrap();

    for (year_id, term_id, mark) in [
        (school.year.id, school.term.id, 80),
        (school.year.id, term2.id, 70),
        (last_year.id, old_term.id, 45),
    ] {
        MarksService::save_marks(
            &db,
            school.teacher.id,
            save_request(year_id, term_id, vec![(school.math.id, vec![(amina.id, json!(mark))])]),
        )
        .await
        .unwrap();
    }

    let query = |academic_year_id, term_id| AcademicHistoryQuery {
        pupil_id: amina.id,
        academic_year_id,
        term_id,
    };

    let everything = MarksService::academic_history(&db, school.teacher.id, query(None, None))
        .await
        .unwrap();
    assert_eq!(everything.pupil.id, amina.id);
    assert_eq!(everything.stats.total_assessments, 3);
    // (80 + 70 + 45) / 3 = 65
    assert_eq!(everything.stats.average_score, Some(65.0));
    assert!(everything.assessments.iter().all(|a| a.subject == "Mathematics"));
    assert!(everything.assessments.iter().all(|a| a.total_marks == 100.0));

    let this_year = MarksService::academic_history(&db, school.teacher.id, query(Some(school.year.id), None))
        .await
        .unwrap();
    let mut scores: Vec<f64> = this_year.assessments.iter().map(|a| a.score).collect();
    scores.sort_by(f64::total_cmp);
    assert_eq!(scores, vec![70.0, 80.0]);
    assert_eq!(this_year.stats.average_score, Some(75.0));

    let one_term = MarksService::academic_history(&db, school.teacher.id, query(None, Some(term2.id)))
        .await
        .unwrap();
    assert_eq!(one_term.assessments.len(), 1);
    assert_eq!(one_term.assessments[0].score, 70.0);

    let mismatched = MarksService::academic_history(
        &db,
        school.teacher.id,
        query(Some(last_year.id), Some(term2.id)),
    )
    .await
    .unwrap();
    assert_eq!(mismatched.stats.total_assessments, 0);
    assert_eq!(mismatched.stats.average_score, None);
}

#[tokio::test]
async fn academic_history_of_another_teachers_pupil_is_not_found() {
    let db = setup_test_db().await;
    let school = seed_school(&db).await;
    let amina = add_pupil(&db, "Amina", Some(school.class.id), Some(school.stream.id)).await;
    let other = helpers::create_user(&db, "teacher2", db::models::user::UserRole::Teacher).await;

    let err = MarksService::academic_history(
        &db,
        other.id,
        AcademicHistoryQuery { pupil_id: amina.id, academic_year_id: None, term_id: None },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
