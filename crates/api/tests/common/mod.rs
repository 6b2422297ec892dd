//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the full application router (same middleware stack as
//! production) on top of a `#[sqlx::test]`-provided pool, plus request
//! helpers and database seeding shortcuts.

#![allow(dead_code)] // not every test binary uses every helper

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use lms_api::auth::jwt::JwtConfig;
use lms_api::auth::password::hash_password;
use lms_api::config::ServerConfig;
use lms_api::router::build_app_router;
use lms_api::state::AppState;
use lms_db::models::instructor::CreateInstructor;
use lms_db::models::learner::CreateLearner;
use lms_db::repositories::{InstructorRepo, LearnerRepo};

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This goes through [`build_app_router`] so integration tests exercise
/// the same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::get(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Request::post(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn put_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Request::put(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::delete(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// Deserialize a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("request should not fail at the transport level")
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// Password used for every seeded account.
pub const TEST_PASSWORD: &str = "test-password-1";

/// Create a learner (account + profile) directly through the repository.
/// Returns the learner profile id.
pub async fn seed_learner(pool: &PgPool, name: &str, email: &str) -> i64 {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let learner = LearnerRepo::create(
        pool,
        &CreateLearner {
            name: name.to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            password_hash: hashed,
        },
    )
    .await
    .expect("learner creation should succeed");
    learner.id
}

/// Create an instructor (account + profile) directly through the
/// repository. Returns the instructor profile id.
pub async fn seed_instructor(pool: &PgPool, name: &str, email: &str) -> i64 {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let instructor = InstructorRepo::create(
        pool,
        &CreateInstructor {
            name: name.to_string(),
            email: email.to_string(),
            expertise: "Testing".to_string(),
            password_hash: hashed,
        },
    )
    .await
    .expect("instructor creation should succeed");
    instructor.id
}

/// Insert an admin account directly; there is deliberately no API or
/// repository path that creates admins.
pub async fn seed_admin(pool: &PgPool, email: &str) -> i64 {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO users (email, password_hash, role) VALUES ($1, $2, 'admin') RETURNING id",
    )
    .bind(email)
    .bind(hashed)
    .fetch_one(pool)
    .await
    .expect("admin creation should succeed");
    id
}

/// Insert a course directly. Returns the course id.
pub async fn seed_course(pool: &PgPool, name: &str, instructor_id: Option<i64>) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO courses (name, description, instructor_id)
         VALUES ($1, 'Seeded course', $2) RETURNING id",
    )
    .bind(name)
    .bind(instructor_id)
    .fetch_one(pool)
    .await
    .expect("course creation should succeed");
    id
}

/// Insert a lecture directly. Returns the lecture id.
pub async fn seed_lecture(pool: &PgPool, course_id: i64, title: &str) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO lectures (course_id, title, content)
         VALUES ($1, $2, 'Seeded content') RETURNING id",
    )
    .bind(course_id)
    .bind(title)
    .fetch_one(pool)
    .await
    .expect("lecture creation should succeed");
    id
}

/// Log in through the API and return the full auth response JSON.
pub async fn login_full(app: &Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    body_json(response).await
}

/// Log in through the API and return just the access token.
pub async fn login(app: &Router, email: &str) -> String {
    let json = login_full(app, email, TEST_PASSWORD).await;
    json["access_token"]
        .as_str()
        .expect("access_token should be a string")
        .to_string()
}
