//! # Grade Module
//!
//! Maps a raw percentage onto the nine UNEB grade bands. The comparison is done on
//! the raw float: no rounding is applied, so `79.999` is still a grade `2`.
//!
//! | percentage ≥ | grade | points |
//! |---|---|---|
//! | 80 | 1 | 1 |
//! | 75 | 2 | 2 |
//! | 65 | 3 | 3 |
//! | 60 | 4 | 4 |
//! | 55 | 5 | 5 |
//! | 50 | 6 | 6 |
//! | 45 | 7 | 7 |
//! | 40 | 8 | 8 |
//! | else | 9 | 9 |

use crate::error::GradingError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Lower bound of each band, best band first. Anything below the last bound is grade 9.
const BANDS: [(f64, u8); 8] = [
    (80.0, 1),
    (75.0, 2),
    (65.0, 3),
    (60.0, 4),
    (55.0, 5),
    (50.0, 6),
    (45.0, 7),
    (40.0, 8),
];

const LOWEST_GRADE: u8 = 9;

/// A UNEB grade between `1` (best) and `9` (worst).
///
/// The grade and the points it is worth share the same number, but they are
/// exposed separately because the grade is stored as text and the points as an
/// integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Grade(u8);

impl Grade {
    /// Looks up the band for an already validated percentage.
    fn from_percentage(percentage: f64) -> Self {
        BANDS
            .iter()
            .find(|(min, _)| percentage >= *min)
            .map(|(_, grade)| Grade(*grade))
            .unwrap_or(Grade(LOWEST_GRADE))
    }

    /// Points awarded for this grade (1 = best, 9 = worst).
    pub fn points(self) -> u8 {
        self.0
    }

    /// Text form of the grade as stored on a result row, e.g. `"4"`.
    pub fn label(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Rejects NaN, infinities and anything outside `0..=100`. A `-0.0` comes back as `0.0`.
pub fn validate_percentage(percentage: f64) -> Result<f64, GradingError> {
    if percentage.is_finite() && (0.0..=100.0).contains(&percentage) {
        Ok(percentage + 0.0)
    } else {
        Err(GradingError::OutOfRange(percentage))
    }
}

/// Computes the UNEB grade for a percentage.
///
/// # Errors
/// Returns [`GradingError::OutOfRange`] for values outside `0..=100` or non-finite values.
///
/// # Example
/// ```
/// use grading::grade;
///
/// assert_eq!(grade(85.0).unwrap().label(), "1");
/// assert_eq!(grade(39.5).unwrap().label(), "9");
/// assert!(grade(101.0).is_err());
/// ```
pub fn grade(percentage: f64) -> Result<Grade, GradingError> {
    validate_percentage(percentage).map(Grade::from_percentage)
}

/// Computes the UNEB points for a percentage. Same bands as [`grade`].
pub fn points(percentage: f64) -> Result<u8, GradingError> {
    grade(percentage).map(Grade::points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_band_covers_eighty_to_hundred() {
        for p in [80.0, 80.5, 92.0, 99.99, 100.0] {
            assert_eq!(grade(p).unwrap().label(), "1", "percentage {p}");
            assert_eq!(points(p).unwrap(), 1, "percentage {p}");
        }
    }

    #[test]
    fn bottom_band_covers_zero_to_below_forty() {
        for p in [0.0, 10.0, 39.0, 39.999] {
            assert_eq!(grade(p).unwrap().label(), "9", "percentage {p}");
            assert_eq!(points(p).unwrap(), 9, "percentage {p}");
        }
    }

    #[test]
    fn negative_zero_is_accepted_as_zero() {
        let normalised = validate_percentage(-0.0).unwrap();
        assert!(normalised.is_sign_positive());
        assert_eq!(grade(-0.0).unwrap().label(), "9");
    }

    #[test]
    fn each_boundary_selects_its_band_and_one_below_drops_a_band() {
        let boundaries = [
            (80.0, 1),
            (75.0, 2),
            (65.0, 3),
            (60.0, 4),
            (55.0, 5),
            (50.0, 6),
            (45.0, 7),
            (40.0, 8),
        ];

        for (boundary, expected) in boundaries {
            assert_eq!(points(boundary).unwrap(), expected, "at {boundary}");
            assert_eq!(
                points(boundary - 1.0).unwrap(),
                expected + 1,
                "one below {boundary}"
            );
        }
    }

    #[test]
    fn no_rounding_is_applied() {
        assert_eq!(points(79.999).unwrap(), 2);
        assert_eq!(points(64.9).unwrap(), 4);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(grade(-0.5), Err(GradingError::OutOfRange(-0.5)));
        assert_eq!(grade(100.01), Err(GradingError::OutOfRange(100.01)));
        assert!(grade(f64::NAN).is_err());
        assert!(points(f64::INFINITY).is_err());
    }

    #[test]
    fn grade_serializes_as_text() {
        let json = serde_json::to_string(&grade(61.0).unwrap()).unwrap();
        assert_eq!(json, "\"4\"");
    }
}
