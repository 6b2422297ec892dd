//! Domain error taxonomy.
//!
//! Repositories and handlers map everything user-visible onto these
//! variants; the API crate turns them into HTTP status codes. Storage
//! failures are not represented here -- they stay `sqlx::Error` until the
//! response boundary sanitizes them.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
