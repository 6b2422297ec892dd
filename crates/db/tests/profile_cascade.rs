//! Integration tests for profile/account atomicity and cascade behaviour:
//! - account + profile created together or not at all
//! - learner deletion removes enrollments and view history
//! - instructor deletion orphans courses instead of deleting them
//! - course deletion takes lectures, enrollments, and views with it

use sqlx::PgPool;

use lms_db::models::course::CreateCourse;
use lms_db::models::instructor::CreateInstructor;
use lms_db::models::learner::{CreateLearner, UpdateLearner};
use lms_db::models::lecture::CreateLecture;
use lms_db::repositories::{CourseRepo, EnrollmentRepo, InstructorRepo, LearnerRepo, LectureRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_learner(name: &str, email: &str) -> CreateLearner {
    CreateLearner {
        name: name.to_string(),
        email: email.to_string(),
        phone: "555-0100".to_string(),
        password_hash: "$argon2id$test-only$not-a-real-hash".to_string(),
    }
}

fn new_instructor(name: &str, email: &str) -> CreateInstructor {
    CreateInstructor {
        name: name.to_string(),
        email: email.to_string(),
        expertise: "Systems".to_string(),
        password_hash: "$argon2id$test-only$not-a-real-hash".to_string(),
    }
}

async fn table_count(pool: &PgPool, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("{table} count failed: {e}"));
    count
}

// ---------------------------------------------------------------------------
// Creation atomicity
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_create_learner_creates_backing_account(pool: PgPool) {
    let learner = LearnerRepo::create(&pool, &new_learner("Ada", "ada@example.com"))
        .await
        .expect("creation should succeed");

    let user = UserRepo::find_by_id(&pool, learner.user_id)
        .await
        .unwrap()
        .expect("backing account must exist");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.role, "learner");
    assert!(user.last_login_at.is_none());
}

#[sqlx::test]
async fn test_duplicate_email_creates_nothing(pool: PgPool) {
    LearnerRepo::create(&pool, &new_learner("Ada", "ada@example.com"))
        .await
        .expect("first creation should succeed");

    let result = LearnerRepo::create(&pool, &new_learner("Imposter", "ada@example.com")).await;
    assert!(result.is_err(), "duplicate email must be rejected");

    assert_eq!(table_count(&pool, "users").await, 1);
    assert_eq!(table_count(&pool, "learners").await, 1);
}

#[sqlx::test]
async fn test_email_unique_across_roles(pool: PgPool) {
    InstructorRepo::create(&pool, &new_instructor("Grace", "grace@example.com"))
        .await
        .expect("instructor creation should succeed");

    let result = LearnerRepo::create(&pool, &new_learner("Grace", "grace@example.com")).await;
    assert!(result.is_err(), "email is unique across all roles");
    assert_eq!(table_count(&pool, "learners").await, 0);
}

// ---------------------------------------------------------------------------
// Deletion cascades
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_delete_learner_cascades_history(pool: PgPool) {
    let learner = LearnerRepo::create(&pool, &new_learner("Ada", "ada@example.com"))
        .await
        .unwrap();
    let course = CourseRepo::create(
        &pool,
        &CreateCourse {
            name: "Databases".to_string(),
            description: String::new(),
            instructor_id: None,
        },
    )
    .await
    .unwrap();
    let lecture = LectureRepo::create(
        &pool,
        &CreateLecture {
            course_id: course.id,
            title: "One".to_string(),
            content: "...".to_string(),
        },
    )
    .await
    .unwrap();
    EnrollmentRepo::enroll(&pool, learner.id, course.id).await.unwrap();
    EnrollmentRepo::record_view(&pool, learner.id, lecture.id).await.unwrap();

    let deleted = LearnerRepo::delete(&pool, learner.id).await.unwrap();
    assert!(deleted);

    assert_eq!(table_count(&pool, "users").await, 0, "account must be gone");
    assert_eq!(table_count(&pool, "learners").await, 0, "profile must be gone");
    assert_eq!(table_count(&pool, "enrollments").await, 0, "no orphaned enrollments");
    assert_eq!(table_count(&pool, "lecture_views").await, 0, "no orphaned views");

    // The catalog is untouched.
    assert_eq!(table_count(&pool, "courses").await, 1);
    assert_eq!(table_count(&pool, "lectures").await, 1);
}

#[sqlx::test]
async fn test_delete_instructor_orphans_courses(pool: PgPool) {
    let instructor = InstructorRepo::create(&pool, &new_instructor("Grace", "grace@example.com"))
        .await
        .unwrap();
    let course = CourseRepo::create(
        &pool,
        &CreateCourse {
            name: "Compilers".to_string(),
            description: String::new(),
            instructor_id: Some(instructor.id),
        },
    )
    .await
    .unwrap();

    let deleted = InstructorRepo::delete(&pool, instructor.id).await.unwrap();
    assert!(deleted);

    assert_eq!(table_count(&pool, "users").await, 0);
    assert_eq!(table_count(&pool, "instructors").await, 0);

    let course = CourseRepo::find_by_id(&pool, course.id)
        .await
        .unwrap()
        .expect("course must survive its owner");
    assert_eq!(course.instructor_id, None, "ownership must be cleared, not deleted");
}

#[sqlx::test]
async fn test_delete_course_cascades_catalog_and_history(pool: PgPool) {
    let learner = LearnerRepo::create(&pool, &new_learner("Ada", "ada@example.com"))
        .await
        .unwrap();
    let course = CourseRepo::create(
        &pool,
        &CreateCourse {
            name: "Databases".to_string(),
            description: String::new(),
            instructor_id: None,
        },
    )
    .await
    .unwrap();
    let lecture = LectureRepo::create(
        &pool,
        &CreateLecture {
            course_id: course.id,
            title: "One".to_string(),
            content: "...".to_string(),
        },
    )
    .await
    .unwrap();
    EnrollmentRepo::enroll(&pool, learner.id, course.id).await.unwrap();
    EnrollmentRepo::record_view(&pool, learner.id, lecture.id).await.unwrap();

    let deleted = CourseRepo::delete(&pool, course.id).await.unwrap();
    assert!(deleted);

    assert_eq!(table_count(&pool, "lectures").await, 0);
    assert_eq!(table_count(&pool, "enrollments").await, 0);
    assert_eq!(table_count(&pool, "lecture_views").await, 0);

    // The learner and their account are untouched.
    assert_eq!(table_count(&pool, "learners").await, 1);
    assert_eq!(table_count(&pool, "users").await, 1);
}

#[sqlx::test]
async fn test_delete_missing_learner_reports_false(pool: PgPool) {
    let deleted = LearnerRepo::delete(&pool, 4242).await.unwrap();
    assert!(!deleted);
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_update_learner_moves_account_email(pool: PgPool) {
    let learner = LearnerRepo::create(&pool, &new_learner("Ada", "ada@example.com"))
        .await
        .unwrap();

    let updated = LearnerRepo::update(
        &pool,
        learner.id,
        &UpdateLearner {
            name: Some("Ada L.".to_string()),
            phone: None,
            email: Some("ada.l@example.com".to_string()),
        },
    )
    .await
    .unwrap()
    .expect("update should find the row");

    assert_eq!(updated.name, "Ada L.");
    assert_eq!(updated.phone, "555-0100", "omitted field must keep its value");
    assert_eq!(updated.email, "ada.l@example.com");

    let user = UserRepo::find_by_email(&pool, "ada.l@example.com").await.unwrap();
    assert!(user.is_some(), "account email must move with the profile");
}

#[sqlx::test]
async fn test_update_with_no_fields_is_noop_success(pool: PgPool) {
    let learner = LearnerRepo::create(&pool, &new_learner("Ada", "ada@example.com"))
        .await
        .unwrap();

    let updated = LearnerRepo::update(&pool, learner.id, &UpdateLearner::default())
        .await
        .unwrap()
        .expect("no-op update should still return the row");

    assert_eq!(updated.name, "Ada");
    assert_eq!(updated.phone, "555-0100");
    assert_eq!(updated.email, "ada@example.com");
}

#[sqlx::test]
async fn test_update_missing_learner_returns_none(pool: PgPool) {
    let updated = LearnerRepo::update(&pool, 4242, &UpdateLearner::default())
        .await
        .unwrap();
    assert!(updated.is_none());
}
