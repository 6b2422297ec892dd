//! Learner profile model and DTOs.

use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Profile row from the `learners` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Learner {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub phone: String,
}

/// Profile joined with its account for listing and detail views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LearnerAccount {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub last_login_at: Option<Timestamp>,
}

/// DTO for creating a learner together with its backing account.
#[derive(Debug)]
pub struct CreateLearner {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

/// DTO for partial updates. `None` leaves a field untouched; the account
/// email moves with the profile when supplied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLearner {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}
