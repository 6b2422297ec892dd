//! Instructor profile model, DTOs, and the workload report row.

use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Profile row from the `instructors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Instructor {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub expertise: String,
}

/// Profile joined with its account for listing and detail views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InstructorAccount {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub expertise: String,
    pub email: String,
    pub last_login_at: Option<Timestamp>,
}

/// DTO for creating an instructor together with its backing account.
#[derive(Debug)]
pub struct CreateInstructor {
    pub name: String,
    pub email: String,
    pub expertise: String,
    pub password_hash: String,
}

/// DTO for partial updates. `None` leaves a field untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateInstructor {
    pub name: Option<String>,
    pub expertise: Option<String>,
    pub email: Option<String>,
}

/// One row of the admin workload report.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InstructorWorkload {
    pub id: DbId,
    pub name: String,
    pub expertise: String,
    pub course_count: i64,
    pub learner_count: i64,
    pub lecture_count: i64,
}
