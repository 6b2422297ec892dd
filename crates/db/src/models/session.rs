//! Refresh-token session model and DTO.

use lms_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked: bool,
    pub created_at: Timestamp,
}

/// DTO for persisting a new session.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
