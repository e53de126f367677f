//! Grading Error Types
//!
//! [`GradingError`] covers the inputs the grading engine refuses to work with.
//! Out-of-range percentages are rejected rather than clamped so that a bad mark
//! can never silently turn into a valid grade.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradingError {
    /// The percentage is NaN, infinite, or outside `0..=100`.
    #[error("Percentage must be a number between 0 and 100, got {0}")]
    OutOfRange(f64),
}
