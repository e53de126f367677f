pub mod academic_year;
pub mod assessment_record;
pub mod assessment_result;
pub mod class_stream;
pub mod exam_schedule;
pub mod pupil;
pub mod school_class;
pub mod school_settings;
pub mod stream;
pub mod subject;
pub mod teacher_assignment;
pub mod term;
pub mod user;

pub use academic_year::Entity as AcademicYear;
pub use assessment_record::Entity as AssessmentRecord;
pub use assessment_result::Entity as AssessmentResult;
pub use class_stream::Entity as ClassStream;
pub use exam_schedule::Entity as ExamSchedule;
pub use pupil::Entity as Pupil;
pub use school_class::Entity as SchoolClass;
pub use school_settings::Entity as SchoolSettings;
pub use stream::Entity as Stream;
pub use subject::Entity as Subject;
pub use teacher_assignment::Entity as TeacherAssignment;
pub use term::Entity as Term;
pub use user::Entity as User;
