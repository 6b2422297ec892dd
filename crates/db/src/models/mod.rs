//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for partial updates
//! - Read models for the joined shapes the handlers serve

pub mod course;
pub mod enrollment;
pub mod instructor;
pub mod learner;
pub mod lecture;
pub mod session;
pub mod user;
