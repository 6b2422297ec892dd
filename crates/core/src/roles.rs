//! The closed set of account roles.
//!
//! Role names are stored as lowercase text in the `users.role` column; the
//! string constants must match the CHECK constraint in
//! `create_users_table.sql`.

use serde::{Deserialize, Serialize};

pub const ROLE_LEARNER: &str = "learner";
pub const ROLE_INSTRUCTOR: &str = "instructor";
pub const ROLE_ADMIN: &str = "admin";

/// Account role. Every authorization decision branches on this enum rather
/// than on raw strings, so an unknown role is rejected once at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Learner,
    Instructor,
    Admin,
}

impl Role {
    /// The storage/wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Learner => ROLE_LEARNER,
            Role::Instructor => ROLE_INSTRUCTOR,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Parse a stored role name. Returns `None` for anything outside the
    /// closed set.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            ROLE_LEARNER => Some(Role::Learner),
            ROLE_INSTRUCTOR => Some(Role::Instructor),
            ROLE_ADMIN => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
