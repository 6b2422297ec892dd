//! Route definitions for the admin resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the admin role.
///
/// ```text
/// GET    /dashboard                  -> dashboard
/// GET    /reports                    -> reports
///
/// GET    /learners                   -> list_learners (?search=)
/// POST   /learners                   -> create_learner
/// GET    /learners/{id}              -> get_learner
/// PUT    /learners/{id}              -> update_learner
/// DELETE /learners/{id}              -> delete_learner
///
/// GET    /instructors                -> list_instructors (?search=)
/// POST   /instructors                -> create_instructor
/// GET    /instructors/{id}           -> get_instructor
/// PUT    /instructors/{id}           -> update_instructor
/// DELETE /instructors/{id}           -> delete_instructor
///
/// GET    /courses                    -> list_courses (?search=)
/// POST   /courses                    -> create_course
/// GET    /courses/{id}               -> get_course
/// PUT    /courses/{id}               -> update_course
/// DELETE /courses/{id}               -> delete_course
/// PUT    /courses/{id}/instructor    -> assign_instructor
/// GET    /courses/{id}/summary       -> course_summary
/// POST   /courses/{id}/lectures      -> add_lecture
///
/// GET    /lectures/{id}              -> get_lecture
/// PUT    /lectures/{id}              -> update_lecture
/// DELETE /lectures/{id}              -> delete_lecture
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/reports", get(admin::reports))
        .route(
            "/learners",
            get(admin::list_learners).post(admin::create_learner),
        )
        .route(
            "/learners/{id}",
            get(admin::get_learner)
                .put(admin::update_learner)
                .delete(admin::delete_learner),
        )
        .route(
            "/instructors",
            get(admin::list_instructors).post(admin::create_instructor),
        )
        .route(
            "/instructors/{id}",
            get(admin::get_instructor)
                .put(admin::update_instructor)
                .delete(admin::delete_instructor),
        )
        .route(
            "/courses",
            get(admin::list_courses).post(admin::create_course),
        )
        .route(
            "/courses/{id}",
            get(admin::get_course)
                .put(admin::update_course)
                .delete(admin::delete_course),
        )
        .route("/courses/{id}/instructor", put(admin::assign_instructor))
        .route("/courses/{id}/summary", get(admin::course_summary))
        .route("/courses/{id}/lectures", post(admin::add_lecture))
        .route(
            "/lectures/{id}",
            get(admin::get_lecture)
                .put(admin::update_lecture)
                .delete(admin::delete_lecture),
        )
}
