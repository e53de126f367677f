pub mod assignment;
pub mod calendar;
pub mod pupil;
pub mod school;
pub mod user;

/// Classes that get streams, teachers and pupils. The lower classes exist but
/// stay empty.
pub const SEEDED_CLASSES: [&str; 3] = ["P5", "P6", "P7"];
pub const STREAMS: [&str; 2] = ["A", "B"];
pub const SUBJECTS: [&str; 4] = ["Mathematics", "English", "Science", "Social Studies"];
