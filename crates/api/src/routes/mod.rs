pub mod admin;
pub mod auth;
pub mod courses;
pub mod health;
pub mod instructor;
pub mod learner;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/...        registration, login, tokens, passwords
/// /courses/...     public catalog + learner enrollment
/// /learner/...     learner dashboard, enrolled courses, lectures, profile
/// /instructor/...  instructor dashboard, owned courses, lectures, roster
/// /admin/...       account provisioning, catalog management, reports
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/courses", courses::router())
        .nest("/learner", learner::router())
        .nest("/instructor", instructor::router())
        .nest("/admin", admin::router())
}
