//! Handlers for the public course catalog and learner enrollment.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::roles::Role;
use lms_core::types::DbId;
use lms_db::models::course::{Course, CourseListing};
use lms_db::models::enrollment::Enrollment;
use lms_db::models::lecture::LectureTitle;
use lms_db::repositories::{CourseRepo, EnrollmentRepo, InstructorRepo, LectureRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::rbac::RequireLearner;
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of courses on the public landing page.
const FEATURED_LIMIT: i64 = 3;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string for `GET /courses`.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
}

/// Instructor fields safe for the public catalog (no email).
#[derive(Debug, Serialize)]
pub struct PublicInstructor {
    pub id: DbId,
    pub name: String,
    pub expertise: String,
}

/// Response body for `GET /courses/{id}`.
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: Course,
    pub instructor: Option<PublicInstructor>,
    /// Titles only; lecture content is reserved for enrolled learners.
    pub lectures: Vec<LectureTitle>,
    /// Present only when the caller is an authenticated learner.
    pub is_enrolled: Option<bool>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/courses
///
/// Public catalog with instructor names and enrollment counts, optionally
/// filtered by `?search=`.
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<DataResponse<Vec<CourseListing>>>> {
    let courses = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => CourseRepo::search(&state.pool, term).await?,
        _ => CourseRepo::list(&state.pool).await?,
    };
    Ok(Json(DataResponse::new(courses)))
}

/// GET /api/v1/courses/featured
///
/// Newest courses for the landing page.
pub async fn featured_courses(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CourseListing>>>> {
    let courses = CourseRepo::featured(&state.pool, FEATURED_LIMIT).await?;
    Ok(Json(DataResponse::new(courses)))
}

/// GET /api/v1/courses/{id}
///
/// Public course page: metadata, instructor, lecture titles. When the
/// caller is a signed-in learner the response also says whether they are
/// enrolled.
pub async fn course_detail(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<CourseDetailResponse>> {
    let course = CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;

    let instructor = match course.instructor_id {
        Some(instructor_id) => InstructorRepo::find_by_id(&state.pool, instructor_id)
            .await?
            .map(|i| PublicInstructor {
                id: i.id,
                name: i.name,
                expertise: i.expertise,
            }),
        None => None,
    };

    let lectures = LectureRepo::titles_by_course(&state.pool, id).await?;

    let is_enrolled = match &user {
        Some(user) if user.role == Role::Learner => Some(
            EnrollmentRepo::find(&state.pool, user.profile_id, id)
                .await?
                .is_some(),
        ),
        _ => None,
    };

    Ok(Json(CourseDetailResponse {
        course,
        instructor,
        lectures,
        is_enrolled,
    }))
}

/// POST /api/v1/courses/{id}/enroll
///
/// Enroll the acting learner. Idempotent: enrolling twice returns the same
/// enrollment and both calls succeed.
pub async fn enroll(
    State(state): State<AppState>,
    RequireLearner(user): RequireLearner,
    Path(id): Path<DbId>,
) -> AppResult<Json<Enrollment>> {
    // Enrolling in a course that does not exist is a 404, not an FK error.
    CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;

    let enrollment = EnrollmentRepo::enroll(&state.pool, user.profile_id, id).await?;
    Ok(Json(enrollment))
}

/// POST /api/v1/courses/{id}/unenroll
///
/// Remove the acting learner's enrollment and their view history for the
/// course, atomically. 404 when no enrollment exists.
pub async fn unenroll(
    State(state): State<AppState>,
    RequireLearner(user): RequireLearner,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = EnrollmentRepo::unenroll(&state.pool, user.profile_id, id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Enrollment",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
