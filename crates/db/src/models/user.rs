//! Account entity model and DTOs.

use lms_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full account row from the `users` table.
///
/// Contains the password hash -- never serialize this to API responses.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    /// Role name from the closed set; parse with `lms_core::roles::Role`.
    pub role: String,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting an account. The hash must already be computed; the
/// repository layer never sees a plaintext password.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub role: &'static str,
}
