pub mod m202601100001_create_users;
pub mod m202601100002_create_school_classes;
pub mod m202601100003_create_streams;
pub mod m202601100004_create_class_streams;
pub mod m202601100005_create_subjects;
pub mod m202601100006_create_teacher_assignments;
pub mod m202601100007_create_academic_years;
pub mod m202601100008_create_terms;
pub mod m202601100009_create_exam_schedules;
pub mod m202601100010_create_school_settings;
pub mod m202601100011_create_pupils;
pub mod m202601100012_create_assessment_records;
pub mod m202601100013_create_assessment_results;
