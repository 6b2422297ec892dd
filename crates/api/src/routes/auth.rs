//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register         -> register (public, learners only)
/// POST /login            -> login (public)
/// POST /refresh          -> refresh (public)
/// POST /forgot-password  -> forgot_password (public)
/// POST /logout           -> logout (requires auth)
/// POST /change-password  -> change_password (requires auth)
/// GET  /me               -> me (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/logout", post(auth::logout))
        .route("/change-password", post(auth::change_password))
        .route("/me", get(auth::me))
}
