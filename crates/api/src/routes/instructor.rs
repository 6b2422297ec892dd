//! Route definitions for the instructor-facing resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::instructor;
use crate::state::AppState;

/// Routes mounted at `/instructor`. All require the instructor role;
/// course- and lecture-targeting routes are additionally
/// ownership-checked in their handlers.
///
/// ```text
/// GET    /dashboard               -> dashboard
/// GET    /courses                 -> list_courses
/// GET    /courses/{id}            -> course_detail
/// GET    /courses/{id}/students   -> course_students
/// POST   /courses/{id}/lectures   -> add_lecture
/// GET    /lectures/{id}           -> get_lecture
/// PUT    /lectures/{id}           -> update_lecture
/// DELETE /lectures/{id}           -> delete_lecture
/// GET    /profile                 -> get_profile
/// PUT    /profile                 -> update_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(instructor::dashboard))
        .route("/courses", get(instructor::list_courses))
        .route("/courses/{id}", get(instructor::course_detail))
        .route("/courses/{id}/students", get(instructor::course_students))
        .route("/courses/{id}/lectures", post(instructor::add_lecture))
        .route(
            "/lectures/{id}",
            get(instructor::get_lecture)
                .put(instructor::update_lecture)
                .delete(instructor::delete_lecture),
        )
        .route(
            "/profile",
            get(instructor::get_profile).put(instructor::update_profile),
        )
}
