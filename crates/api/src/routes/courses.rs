//! Route definitions for the public catalog and enrollment.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::courses;
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET  /                -> list_courses (public, ?search=)
/// GET  /featured        -> featured_courses (public)
/// GET  /{id}            -> course_detail (public; enrollment flag when authed)
/// POST /{id}/enroll     -> enroll (learner)
/// POST /{id}/unenroll   -> unenroll (learner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list_courses))
        .route("/featured", get(courses::featured_courses))
        .route("/{id}", get(courses::course_detail))
        .route("/{id}/enroll", post(courses::enroll))
        .route("/{id}/unenroll", post(courses::unenroll))
}
