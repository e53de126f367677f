//! # Grading Library
//!
//! Pure grading and ranking logic for the marks-entry workflow. Nothing in this
//! crate touches the database; callers feed it plain numbers and persist the
//! results themselves.
//!
//! ## Key Concepts
//! - **Grade / points**: a percentage is mapped onto the nine UNEB bands. Grade `1`
//!   (1 point) is the best band and grade `9` (9 points) the worst.
//! - **Division**: summary tier derived from a pupil's summed points.
//! - **Ranking policies**: two explicitly named policies, one ranking a single
//!   assessment by raw marks and one ranking pupils by aggregate points within
//!   stream and class groupings.
//! - **Ordinals**: English ordinal positions (`1st`, `2nd`, `11th`, ...).

pub mod division;
pub mod error;
pub mod grade;
pub mod ordinal;
pub mod ranking;

pub use division::{Division, division, performance_remark};
pub use error::GradingError;
pub use grade::{Grade, grade, points};
pub use ordinal::ordinal;
pub use ranking::{
    AggregateEntry, AggregateRanking, AggregateStanding, GroupPosition, MarkEntry,
    RankByAggregatePoints, RankByAssessmentMarks, RankingPolicy, stream_key,
};
