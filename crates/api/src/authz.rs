//! Ownership and enrollment guards.
//!
//! The RBAC extractors decide *role*; these decide *reach*: may this
//! instructor touch this course, may this learner open this lecture.
//! Each guard checks existence and authorization in one step and returns
//! the identical 403 for "does not exist" and "not yours", so a caller
//! probing ids can never learn whether a target exists.

use lms_core::error::CoreError;
use lms_core::types::DbId;
use lms_db::models::course::Course;
use lms_db::models::enrollment::Enrollment;
use lms_db::models::lecture::Lecture;
use lms_db::repositories::{CourseRepo, EnrollmentRepo, LectureRepo};
use lms_db::DbPool;

use crate::error::{AppError, AppResult};

/// Load a course if and only if the acting instructor owns it.
pub async fn owned_course(
    pool: &DbPool,
    instructor_id: DbId,
    course_id: DbId,
) -> AppResult<Course> {
    let course = CourseRepo::find_by_id(pool, course_id).await?;
    match course {
        Some(course) if course.instructor_id == Some(instructor_id) => Ok(course),
        _ => Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to manage this course".into(),
        ))),
    }
}

/// Load a lecture if and only if the acting instructor owns its course.
pub async fn owned_lecture(
    pool: &DbPool,
    instructor_id: DbId,
    lecture_id: DbId,
) -> AppResult<Lecture> {
    let lecture = LectureRepo::find_by_id(pool, lecture_id).await?;
    if let Some(lecture) = lecture {
        if owned_course(pool, instructor_id, lecture.course_id).await.is_ok() {
            return Ok(lecture);
        }
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You do not have permission to manage this lecture".into(),
    )))
}

/// Load a lecture if and only if the acting learner is enrolled in its
/// course.
pub async fn enrolled_lecture(
    pool: &DbPool,
    learner_id: DbId,
    lecture_id: DbId,
) -> AppResult<Lecture> {
    let lecture = LectureRepo::find_by_id(pool, lecture_id).await?;
    if let Some(lecture) = lecture {
        let enrollment = EnrollmentRepo::find(pool, learner_id, lecture.course_id).await?;
        if enrollment.is_some() {
            return Ok(lecture);
        }
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You do not have permission to view this lecture".into(),
    )))
}

/// Load the acting learner's enrollment in a course, or the uniform 403.
pub async fn enrollment_in_course(
    pool: &DbPool,
    learner_id: DbId,
    course_id: DbId,
) -> AppResult<Enrollment> {
    EnrollmentRepo::find(pool, learner_id, course_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "You are not enrolled in this course".into(),
            ))
        })
}
