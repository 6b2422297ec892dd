//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the requirement. Route handlers take one of these instead of
//! re-checking role strings inline, so every role decision lives here.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lms_core::error::CoreError;
use lms_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `learner` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn learner_only(RequireLearner(user): RequireLearner) -> AppResult<Json<()>> {
///     // user.profile_id is the learner row id here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireLearner(pub AuthUser);

impl FromRequestParts<AppState> for RequireLearner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Learner {
            return Err(AppError::Core(CoreError::Forbidden(
                "Learner role required".into(),
            )));
        }
        Ok(RequireLearner(user))
    }
}

/// Requires the `instructor` role. Rejects with 403 Forbidden otherwise.
pub struct RequireInstructor(pub AuthUser);

impl FromRequestParts<AppState> for RequireInstructor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Instructor {
            return Err(AppError::Core(CoreError::Forbidden(
                "Instructor role required".into(),
            )));
        }
        Ok(RequireInstructor(user))
    }
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
