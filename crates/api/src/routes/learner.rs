//! Route definitions for the learner-facing resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::learner;
use crate::state::AppState;

/// Routes mounted at `/learner`. All require the learner role.
///
/// ```text
/// GET /dashboard      -> dashboard
/// GET /courses        -> list_courses (?search=)
/// GET /courses/{id}   -> course_detail (requires enrollment)
/// GET /lectures/{id}  -> view_lecture (requires enrollment; records view)
/// GET /profile        -> get_profile
/// PUT /profile        -> update_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(learner::dashboard))
        .route("/courses", get(learner::list_courses))
        .route("/courses/{id}", get(learner::course_detail))
        .route("/lectures/{id}", get(learner::view_lecture))
        .route(
            "/profile",
            get(learner::get_profile).put(learner::update_profile),
        )
}
