//! Course entity model, DTOs, and catalog read models.

use lms_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the `courses` table. `instructor_id` is `None` for unowned
/// courses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub instructor_id: Option<DbId>,
}

/// Catalog listing row: course joined with its instructor's display name
/// and the current enrollment count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseListing {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub instructor_id: Option<DbId>,
    pub instructor_name: Option<String>,
    pub enrollment_count: i64,
}

/// One row of the admin "active courses" report (courses with at least one
/// enrollment).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActiveCourse {
    pub id: DbId,
    pub name: String,
    pub instructor_name: Option<String>,
    pub enrollment_count: i64,
}

/// DTO for creating a course.
#[derive(Debug)]
pub struct CreateCourse {
    pub name: String,
    pub description: String,
    pub instructor_id: Option<DbId>,
}

/// DTO for partial updates of name/description. Ownership changes go
/// through `CourseRepo::assign_instructor` so an omitted field can never
/// clear the owner.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCourse {
    pub name: Option<String>,
    pub description: Option<String>,
}
