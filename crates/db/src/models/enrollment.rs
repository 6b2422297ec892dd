//! Enrollment and lecture-view models plus the progress read models.

use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub learner_id: DbId,
    pub course_id: DbId,
    pub enrolled_at: Timestamp,
}

/// Raw view/total counts for one (learner, course) pair. The percentage is
/// computed from these by `lms_core::progress`, never read from storage.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ProgressCounts {
    pub viewed_count: i64,
    pub total_count: i64,
}

/// One of a learner's enrollments joined with course metadata and progress
/// counts, for dashboards and course lists.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentProgress {
    pub enrollment_id: DbId,
    pub course_id: DbId,
    pub course_name: String,
    pub course_description: String,
    pub instructor_name: Option<String>,
    pub enrolled_at: Timestamp,
    pub viewed_count: i64,
    pub total_count: i64,
}

/// One enrolled learner in a course roster, with progress counts.
#[derive(Debug, Clone, FromRow)]
pub struct CourseRosterRow {
    pub enrollment_id: DbId,
    pub learner_id: DbId,
    pub learner_name: String,
    pub enrolled_at: Timestamp,
    pub viewed_count: i64,
    pub total_count: i64,
}

/// Recent-enrollment row for the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentEnrollment {
    pub id: DbId,
    pub learner_name: String,
    pub course_name: String,
    pub enrolled_at: Timestamp,
}
