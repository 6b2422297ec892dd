//! Lecture entity model and DTOs.

use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the `lectures` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lecture {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub content: String,
}

/// Title-only row for the public course page, where content is reserved
/// for enrolled learners.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LectureTitle {
    pub id: DbId,
    pub title: String,
}

/// Lecture row annotated with one learner's view state.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LectureWithViewStatus {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub viewed: bool,
    pub viewed_at: Option<Timestamp>,
}

/// DTO for creating a lecture.
#[derive(Debug)]
pub struct CreateLecture {
    pub course_id: DbId,
    pub title: String,
    pub content: String,
}

/// DTO for partial updates. `None` leaves a field untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLecture {
    pub title: Option<String>,
    pub content: Option<String>,
}
