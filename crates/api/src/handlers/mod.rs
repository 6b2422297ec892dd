//! Request handlers, one module per resource.
//!
//! Request/response DTOs live next to the handlers that use them; the two
//! progress-bearing shapes shared by the learner, instructor, and admin
//! views are defined here.

use lms_core::progress::CourseProgress;
use lms_core::types::{DbId, Timestamp};
use lms_db::models::enrollment::{CourseRosterRow, EnrollmentProgress};
use serde::Serialize;

pub mod admin;
pub mod auth;
pub mod courses;
pub mod instructor;
pub mod learner;

/// One of a learner's enrollments with derived progress, as served to
/// dashboards and course lists.
#[derive(Debug, Serialize)]
pub struct EnrollmentSummary {
    pub enrollment_id: DbId,
    pub course_id: DbId,
    pub course_name: String,
    pub course_description: String,
    pub instructor_name: Option<String>,
    pub enrolled_at: Timestamp,
    pub progress: CourseProgress,
}

impl From<EnrollmentProgress> for EnrollmentSummary {
    fn from(row: EnrollmentProgress) -> Self {
        Self {
            enrollment_id: row.enrollment_id,
            course_id: row.course_id,
            course_name: row.course_name,
            course_description: row.course_description,
            instructor_name: row.instructor_name,
            enrolled_at: row.enrolled_at,
            progress: CourseProgress::from_counts(row.viewed_count, row.total_count),
        }
    }
}

/// One enrolled learner in a course roster with derived progress.
#[derive(Debug, Serialize)]
pub struct RosterEntry {
    pub enrollment_id: DbId,
    pub learner_id: DbId,
    pub learner_name: String,
    pub enrolled_at: Timestamp,
    pub progress: CourseProgress,
}

impl From<CourseRosterRow> for RosterEntry {
    fn from(row: CourseRosterRow) -> Self {
        Self {
            enrollment_id: row.enrollment_id,
            learner_id: row.learner_id,
            learner_name: row.learner_name,
            enrolled_at: row.enrolled_at,
            progress: CourseProgress::from_counts(row.viewed_count, row.total_count),
        }
    }
}

/// Treat an absent or empty-string form field as "leave unchanged", so a
/// client can never blank a field by omitting it.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
