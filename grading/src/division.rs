//! # Division Module
//!
//! Derives a division from a pupil's summed points. The sum covers however many
//! subjects the caller passes in; it is not restricted to the best four.

use serde::Serialize;
use std::fmt;

/// Summary performance tier derived from total points. Lower totals are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Division {
    #[serde(rename = "Division 1")]
    One,
    #[serde(rename = "Division 2")]
    Two,
    #[serde(rename = "Division 3")]
    Three,
    #[serde(rename = "Division 4")]
    Four,
    #[serde(rename = "Ungraded (Fail)")]
    Ungraded,
}

impl Division {
    pub fn label(self) -> &'static str {
        match self {
            Division::One => "Division 1",
            Division::Two => "Division 2",
            Division::Three => "Division 3",
            Division::Four => "Division 4",
            Division::Ungraded => "Ungraded (Fail)",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps a points total onto a division.
///
/// | total ≤ | division |
/// |---|---|
/// | 12 | Division 1 |
/// | 23 | Division 2 |
/// | 29 | Division 3 |
/// | 34 | Division 4 |
/// | else | Ungraded (Fail) |
pub fn division(total_points: u32) -> Division {
    match total_points {
        0..=12 => Division::One,
        13..=23 => Division::Two,
        24..=29 => Division::Three,
        30..=34 => Division::Four,
        _ => Division::Ungraded,
    }
}

/// Free-text comment on an aggregate, shown alongside the grade preview.
pub fn performance_remark(total_points: u32, subject_count: usize) -> &'static str {
    if subject_count == 0 {
        return "No subjects to evaluate.";
    }

    match division(total_points) {
        Division::One => "Excellent performance! Outstanding achievement.",
        Division::Two => "Very good work. Continue to excel.",
        Division::Three => "Good performance. Room for improvement in some areas.",
        Division::Four => "Satisfactory performance. Needs to work harder.",
        Division::Ungraded => "Poor performance. Immediate attention needed.",
    }
}
