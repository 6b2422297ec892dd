//! HTTP-level integration tests for enrollment, unenrollment, and the
//! progress views.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get_auth, login, post_json_auth, seed_admin, seed_course, seed_instructor,
    seed_learner, seed_lecture,
};
use sqlx::PgPool;

/// Enrolling twice succeeds both times and leaves one row.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_enroll_is_idempotent(pool: PgPool) {
    seed_learner(&pool, "Ada", "ada@example.com").await;
    let course = seed_course(&pool, "Compilers", None).await;
    let app = common::build_test_app(pool.clone());

    let token = login(&app, "ada@example.com").await;
    let uri = format!("/api/v1/courses/{course}/enroll");

    let first = post_json_auth(&app, &uri, &token, serde_json::json!({})).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;

    let second = post_json_auth(&app, &uri, &token, serde_json::json!({})).await;
    assert_eq!(second.status(), StatusCode::OK);
    let second = body_json(second).await;

    assert_eq!(first["id"], second["id"], "repeat enroll returns the same row");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM enrollments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

/// Enrolling in a nonexistent course is a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_enroll_missing_course(pool: PgPool) {
    seed_learner(&pool, "Ada", "ada@example.com").await;
    let app = common::build_test_app(pool);

    let token = login(&app, "ada@example.com").await;
    let response = post_json_auth(
        &app,
        "/api/v1/courses/999999/enroll",
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Unenroll removes the enrollment and the view history; a second attempt
/// is a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_unenroll_removes_history(pool: PgPool) {
    seed_learner(&pool, "Ada", "ada@example.com").await;
    let course = seed_course(&pool, "Compilers", None).await;
    let lecture = seed_lecture(&pool, course, "Lexing").await;
    let app = common::build_test_app(pool.clone());

    let token = login(&app, "ada@example.com").await;
    post_json_auth(
        &app,
        &format!("/api/v1/courses/{course}/enroll"),
        &token,
        serde_json::json!({}),
    )
    .await;
    get_auth(&app, &format!("/api/v1/learner/lectures/{lecture}"), &token).await;

    let response = post_json_auth(
        &app,
        &format!("/api/v1/courses/{course}/unenroll"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (enrollments,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM enrollments")
        .fetch_one(&pool)
        .await
        .unwrap();
    let (views,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lecture_views")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(enrollments, 0);
    assert_eq!(views, 0, "view history must go with the enrollment");

    let again = post_json_auth(
        &app,
        &format!("/api/v1/courses/{course}/unenroll"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

/// Viewing 2 of 4 lectures reads back as 50% everywhere: the learner's
/// course page, the instructor's roster, and the admin summary.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_progress_reads_consistently(pool: PgPool) {
    seed_learner(&pool, "Ada", "ada@example.com").await;
    let grace = seed_instructor(&pool, "Grace", "grace@example.com").await;
    seed_admin(&pool, "root@example.com").await;
    let course = seed_course(&pool, "Compilers", Some(grace)).await;
    let mut lectures = Vec::new();
    for i in 1..=4 {
        lectures.push(seed_lecture(&pool, course, &format!("Lecture {i}")).await);
    }
    let app = common::build_test_app(pool);

    let learner_token = login(&app, "ada@example.com").await;
    post_json_auth(
        &app,
        &format!("/api/v1/courses/{course}/enroll"),
        &learner_token,
        serde_json::json!({}),
    )
    .await;
    for lecture in &lectures[..2] {
        get_auth(
            &app,
            &format!("/api/v1/learner/lectures/{lecture}"),
            &learner_token,
        )
        .await;
    }

    // Learner's own course page.
    let detail = body_json(
        get_auth(
            &app,
            &format!("/api/v1/learner/courses/{course}"),
            &learner_token,
        )
        .await,
    )
    .await;
    assert_eq!(detail["progress"]["viewed_count"], 2);
    assert_eq!(detail["progress"]["total_count"], 4);
    assert_eq!(detail["progress"]["percentage"], 50);
    let viewed_flags: Vec<bool> = detail["lectures"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["viewed"].as_bool().unwrap())
        .collect();
    assert_eq!(viewed_flags, vec![true, true, false, false]);

    // Instructor roster.
    let instructor_token = login(&app, "grace@example.com").await;
    let roster = body_json(
        get_auth(
            &app,
            &format!("/api/v1/instructor/courses/{course}/students"),
            &instructor_token,
        )
        .await,
    )
    .await;
    assert_eq!(roster["data"][0]["learner_name"], "Ada");
    assert_eq!(roster["data"][0]["progress"]["percentage"], 50);

    // Admin summary.
    let admin_token = login(&app, "root@example.com").await;
    let summary = body_json(
        get_auth(
            &app,
            &format!("/api/v1/admin/courses/{course}/summary"),
            &admin_token,
        )
        .await,
    )
    .await;
    assert_eq!(summary["data"][0]["progress"]["viewed_count"], 2);
    assert_eq!(summary["data"][0]["progress"]["percentage"], 50);
}

/// The learner dashboard reports enrollments with progress and
/// recommendations that exclude enrolled courses.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_learner_dashboard(pool: PgPool) {
    seed_learner(&pool, "Ada", "ada@example.com").await;
    let enrolled = seed_course(&pool, "Enrolled course", None).await;
    seed_course(&pool, "Other course", None).await;
    let app = common::build_test_app(pool);

    let token = login(&app, "ada@example.com").await;
    post_json_auth(
        &app,
        &format!("/api/v1/courses/{enrolled}/enroll"),
        &token,
        serde_json::json!({}),
    )
    .await;

    let json = body_json(get_auth(&app, "/api/v1/learner/dashboard", &token).await).await;
    assert_eq!(json["learner"]["name"], "Ada");
    assert_eq!(json["enrollments"].as_array().unwrap().len(), 1);
    assert_eq!(json["enrollments"][0]["course_name"], "Enrolled course");
    assert_eq!(json["enrollments"][0]["progress"]["percentage"], 0);

    let recommended = json["recommended"].as_array().unwrap();
    assert_eq!(recommended.len(), 1, "enrolled courses are not recommended");
    assert_eq!(recommended[0]["name"], "Other course");
}

/// An admin course summary for a course with no enrollments is an empty
/// list, not an error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_summary_empty_course(pool: PgPool) {
    seed_admin(&pool, "root@example.com").await;
    let course = seed_course(&pool, "Lonely course", None).await;
    let app = common::build_test_app(pool);

    let token = login(&app, "root@example.com").await;
    let response = get_auth(
        &app,
        &format!("/api/v1/admin/courses/{course}/summary"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}
