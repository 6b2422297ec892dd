//! HTTP-level integration tests for admin provisioning, catalog
//! management, and reports.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, login, post_json_auth, put_json_auth, seed_admin,
    seed_course, seed_instructor, seed_learner, seed_lecture,
};
use sqlx::PgPool;

async fn admin_token(pool: &PgPool, app: &axum::Router) -> String {
    seed_admin(pool, "root@example.com").await;
    login(app, "root@example.com").await
}

// ---------------------------------------------------------------------------
// Account provisioning
// ---------------------------------------------------------------------------

/// Admin-created instructors can log in and carry their profile id.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_instructor(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;

    let response = post_json_auth(
        &app,
        "/api/v1/admin/instructors",
        &token,
        serde_json::json!({
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "expertise": "Compilers",
            "password": "strong-enough",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let instructor = body_json(response).await;
    assert_eq!(instructor["name"], "Grace Hopper");

    let json = common::login_full(&app, "grace@example.com", "strong-enough").await;
    assert_eq!(json["user"]["role"], "instructor");
    assert_eq!(json["user"]["profile_id"], instructor["id"]);
}

/// Provisioning with a duplicate email fails and leaves no partial state.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_learner_duplicate_email(pool: PgPool) {
    seed_learner(&pool, "Ada", "ada@example.com").await;
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;

    let response = post_json_auth(
        &app,
        "/api/v1/admin/learners",
        &token,
        serde_json::json!({
            "name": "Imposter",
            "email": "ada@example.com",
            "password": "strong-enough",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM learners")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

/// Admin learner detail includes enrollments with progress.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_learner_detail(pool: PgPool) {
    let learner = seed_learner(&pool, "Ada", "ada@example.com").await;
    let course = seed_course(&pool, "Compilers", None).await;
    seed_lecture(&pool, course, "Lexing").await;
    sqlx::query("INSERT INTO enrollments (learner_id, course_id) VALUES ($1, $2)")
        .bind(learner)
        .bind(course)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;

    let json = body_json(
        get_auth(&app, &format!("/api/v1/admin/learners/{learner}"), &token).await,
    )
    .await;
    assert_eq!(json["name"], "Ada");
    assert_eq!(json["email"], "ada@example.com");
    assert_eq!(json["enrollments"][0]["course_name"], "Compilers");
    assert_eq!(json["enrollments"][0]["progress"]["total_count"], 1);
}

/// Deleting a learner removes the account and the full history.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_learner_cascades(pool: PgPool) {
    let learner = seed_learner(&pool, "Ada", "ada@example.com").await;
    let course = seed_course(&pool, "Compilers", None).await;
    let lecture = seed_lecture(&pool, course, "Lexing").await;
    sqlx::query("INSERT INTO enrollments (learner_id, course_id) VALUES ($1, $2)")
        .bind(learner)
        .bind(course)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO lecture_views (learner_id, lecture_id) VALUES ($1, $2)")
        .bind(learner)
        .bind(lecture)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;

    let response = delete_auth(&app, &format!("/api/v1/admin/learners/{learner}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for table in ["learners", "enrollments", "lecture_views"] {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "{table} must be empty after the cascade");
    }

    // Only the admin account remains.
    let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 1);
}

/// Deleting an instructor clears course ownership instead of deleting the
/// course.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_instructor_orphans_courses(pool: PgPool) {
    let grace = seed_instructor(&pool, "Grace", "grace@example.com").await;
    let course = seed_course(&pool, "Compilers", Some(grace)).await;
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;

    let response =
        delete_auth(&app, &format!("/api/v1/admin/instructors/{grace}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(
        get_auth(&app, &format!("/api/v1/admin/courses/{course}"), &token).await,
    )
    .await;
    assert_eq!(json["name"], "Compilers");
    assert!(json["instructor_id"].is_null(), "ownership must be cleared");
}

// ---------------------------------------------------------------------------
// Course management
// ---------------------------------------------------------------------------

/// Course creation validates the instructor reference.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_course(pool: PgPool) {
    let grace = seed_instructor(&pool, "Grace", "grace@example.com").await;
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;

    let response = post_json_auth(
        &app,
        "/api/v1/admin/courses",
        &token,
        serde_json::json!({
            "name": "Compilers",
            "description": "From lexing to codegen",
            "instructor_id": grace,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let course = body_json(response).await;
    assert_eq!(course["instructor_id"], grace);

    let bad_ref = post_json_auth(
        &app,
        "/api/v1/admin/courses",
        &token,
        serde_json::json!({ "name": "Ghost-taught", "instructor_id": 999999 }),
    )
    .await;
    assert_eq!(bad_ref.status(), StatusCode::NOT_FOUND);

    let unnamed = post_json_auth(
        &app,
        "/api/v1/admin/courses",
        &token,
        serde_json::json!({ "name": "  " }),
    )
    .await;
    assert_eq!(unnamed.status(), StatusCode::BAD_REQUEST);
}

/// Partial course updates touch only supplied fields; an empty update is a
/// no-op success.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_course_partial_and_noop(pool: PgPool) {
    let course = seed_course(&pool, "Old name", None).await;
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;
    let uri = format!("/api/v1/admin/courses/{course}");

    let renamed = body_json(
        put_json_auth(&app, &uri, &token, serde_json::json!({ "name": "New name" })).await,
    )
    .await;
    assert_eq!(renamed["name"], "New name");
    assert_eq!(
        renamed["description"], "Seeded course",
        "omitted field must keep its value"
    );

    let noop = put_json_auth(&app, &uri, &token, serde_json::json!({})).await;
    assert_eq!(noop.status(), StatusCode::OK, "empty update is a no-op success");
    let noop = body_json(noop).await;
    assert_eq!(noop["name"], "New name");

    // Empty strings are treated as omitted, never as a blanking write.
    let blanked = body_json(
        put_json_auth(&app, &uri, &token, serde_json::json!({ "name": "" })).await,
    )
    .await;
    assert_eq!(blanked["name"], "New name");
}

/// Ownership is assigned and cleared through the dedicated endpoint.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_assign_and_clear_instructor(pool: PgPool) {
    let grace = seed_instructor(&pool, "Grace", "grace@example.com").await;
    let course = seed_course(&pool, "Compilers", None).await;
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;
    let uri = format!("/api/v1/admin/courses/{course}/instructor");

    let assigned = body_json(
        put_json_auth(&app, &uri, &token, serde_json::json!({ "instructor_id": grace })).await,
    )
    .await;
    assert_eq!(assigned["instructor_id"], grace);

    let cleared = body_json(
        put_json_auth(&app, &uri, &token, serde_json::json!({ "instructor_id": null })).await,
    )
    .await;
    assert!(cleared["instructor_id"].is_null());
}

/// Admin lecture CRUD under a course.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_lecture_crud(pool: PgPool) {
    let course = seed_course(&pool, "Compilers", None).await;
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;

    let created = post_json_auth(
        &app,
        &format!("/api/v1/admin/courses/{course}/lectures"),
        &token,
        serde_json::json!({ "title": "Lexing", "content": "Tokens." }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let lecture = body_json(created).await;
    let lecture_id = lecture["id"].as_i64().unwrap();

    let blank = post_json_auth(
        &app,
        &format!("/api/v1/admin/courses/{course}/lectures"),
        &token,
        serde_json::json!({ "title": "", "content": "" }),
    )
    .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let updated = body_json(
        put_json_auth(
            &app,
            &format!("/api/v1/admin/lectures/{lecture_id}"),
            &token,
            serde_json::json!({ "title": "Lexing & scanning" }),
        )
        .await,
    )
    .await;
    assert_eq!(updated["title"], "Lexing & scanning");
    assert_eq!(updated["content"], "Tokens.");

    let deleted = delete_auth(&app, &format!("/api/v1/admin/lectures/{lecture_id}"), &token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = get_auth(&app, &format!("/api/v1/admin/lectures/{lecture_id}"), &token).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Dashboard & reports
// ---------------------------------------------------------------------------

/// Dashboard counts and recent enrollments reflect the data.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_dashboard_counts(pool: PgPool) {
    let learner = seed_learner(&pool, "Ada", "ada@example.com").await;
    let grace = seed_instructor(&pool, "Grace", "grace@example.com").await;
    let course = seed_course(&pool, "Compilers", Some(grace)).await;
    sqlx::query("INSERT INTO enrollments (learner_id, course_id) VALUES ($1, $2)")
        .bind(learner)
        .bind(course)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;

    let json = body_json(get_auth(&app, "/api/v1/admin/dashboard", &token).await).await;
    assert_eq!(json["learner_count"], 1);
    assert_eq!(json["instructor_count"], 1);
    assert_eq!(json["course_count"], 1);
    assert_eq!(json["enrollment_count"], 1);
    assert_eq!(json["recent_enrollments"][0]["learner_name"], "Ada");
    assert_eq!(json["recent_enrollments"][0]["course_name"], "Compilers");
}

/// Reports aggregate workload per instructor and list active courses.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reports(pool: PgPool) {
    let learner = seed_learner(&pool, "Ada", "ada@example.com").await;
    let grace = seed_instructor(&pool, "Grace", "grace@example.com").await;
    let taught = seed_course(&pool, "Compilers", Some(grace)).await;
    seed_course(&pool, "Unenrolled course", None).await;
    seed_lecture(&pool, taught, "Lexing").await;
    sqlx::query("INSERT INTO enrollments (learner_id, course_id) VALUES ($1, $2)")
        .bind(learner)
        .bind(taught)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;

    let json = body_json(get_auth(&app, "/api/v1/admin/reports", &token).await).await;

    let workload = &json["instructor_workload"][0];
    assert_eq!(workload["name"], "Grace");
    assert_eq!(workload["course_count"], 1);
    assert_eq!(workload["learner_count"], 1);
    assert_eq!(workload["lecture_count"], 1);

    let active = json["active_courses"].as_array().unwrap();
    assert_eq!(active.len(), 1, "only courses with enrollments are active");
    assert_eq!(active[0]["name"], "Compilers");
    assert_eq!(active[0]["enrollment_count"], 1);
}
