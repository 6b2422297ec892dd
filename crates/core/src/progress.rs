//! Course completion computed from lecture view counts.
//!
//! The percentage is always derived from the two counts; it is never stored
//! and never trusted from the client.

use serde::Serialize;

/// Progress of one learner through one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CourseProgress {
    /// Distinct lectures of the course the learner has opened.
    pub viewed_count: i64,
    /// Total lectures currently in the course.
    pub total_count: i64,
    /// `round(100 * viewed / total)`; 0 for a course with no lectures.
    pub percentage: u8,
}

impl CourseProgress {
    pub fn from_counts(viewed_count: i64, total_count: i64) -> Self {
        Self {
            viewed_count,
            total_count,
            percentage: percentage(viewed_count, total_count),
        }
    }
}

/// Completion percentage, rounded half away from zero.
///
/// A course with zero lectures is 0% complete regardless of view events.
pub fn percentage(viewed: i64, total: i64) -> u8 {
    if total <= 0 {
        return 0;
    }
    (100.0 * viewed as f64 / total as f64).round() as u8
}
