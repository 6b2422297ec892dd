//! Handlers for the `/admin` resource: account provisioning, catalog
//! management, and reporting.
//!
//! All handlers require the `admin` role via [`RequireAdmin`]. Admins have
//! visibility over everything, so absent targets answer 404 here rather
//! than the uniform 403 the ownership guards use.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::types::DbId;
use lms_db::models::course::{
    ActiveCourse, Course, CourseListing, CreateCourse, UpdateCourse,
};
use lms_db::models::enrollment::RecentEnrollment;
use lms_db::models::instructor::{
    CreateInstructor, Instructor, InstructorAccount, InstructorWorkload, UpdateInstructor,
};
use lms_db::models::learner::{CreateLearner, Learner, LearnerAccount, UpdateLearner};
use lms_db::models::lecture::{CreateLecture, Lecture, UpdateLecture};
use lms_db::repositories::{
    CourseRepo, EnrollmentRepo, InstructorRepo, LearnerRepo, LectureRepo, UserRepo,
};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::handlers::{non_empty, EnrollmentSummary, RosterEntry};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Minimum password length for admin-provisioned accounts.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Recent enrollments shown on the dashboard.
const RECENT_ENROLLMENTS_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Shared `?search=` query string for the admin list endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Response body for `GET /admin/dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub learner_count: i64,
    pub instructor_count: i64,
    pub course_count: i64,
    pub enrollment_count: i64,
    pub recent_enrollments: Vec<RecentEnrollment>,
}

/// Request body for `POST /admin/learners`.
#[derive(Debug, Deserialize)]
pub struct CreateLearnerRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
}

/// Request body for `PUT /admin/learners/{id}`. Empty fields are left
/// unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateLearnerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Response body for `GET /admin/learners/{id}`.
#[derive(Debug, Serialize)]
pub struct LearnerDetailResponse {
    #[serde(flatten)]
    pub learner: LearnerAccount,
    pub enrollments: Vec<EnrollmentSummary>,
}

/// Request body for `POST /admin/instructors`.
#[derive(Debug, Deserialize)]
pub struct CreateInstructorRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub expertise: String,
    pub password: String,
}

/// Request body for `PUT /admin/instructors/{id}`. Empty fields are left
/// unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateInstructorRequest {
    pub name: Option<String>,
    pub expertise: Option<String>,
    pub email: Option<String>,
}

/// Request body for `POST /admin/courses`.
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub instructor_id: Option<DbId>,
}

/// Request body for `PUT /admin/courses/{id}`. Empty fields are left
/// unchanged; ownership changes go through the dedicated instructor
/// endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Request body for `PUT /admin/courses/{id}/instructor`. `null` clears
/// ownership.
#[derive(Debug, Deserialize)]
pub struct AssignInstructorRequest {
    pub instructor_id: Option<DbId>,
}

/// Response body for `GET /admin/courses/{id}`.
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: Course,
    pub lectures: Vec<Lecture>,
}

/// Request body for lecture creation under `/admin/courses/{id}/lectures`.
#[derive(Debug, Deserialize)]
pub struct AddLectureRequest {
    pub title: String,
    pub content: String,
}

/// Request body for `PUT /admin/lectures/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateLectureRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Response body for `GET /admin/reports`.
#[derive(Debug, Serialize)]
pub struct ReportsResponse {
    pub instructor_workload: Vec<InstructorWorkload>,
    pub active_courses: Vec<ActiveCourse>,
}

// ---------------------------------------------------------------------------
// Dashboard & reports
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DashboardResponse>> {
    let learner_count = LearnerRepo::count(&state.pool).await?;
    let instructor_count = InstructorRepo::count(&state.pool).await?;
    let course_count = CourseRepo::count(&state.pool).await?;
    let enrollment_count = EnrollmentRepo::count(&state.pool).await?;
    let recent_enrollments =
        EnrollmentRepo::recent(&state.pool, RECENT_ENROLLMENTS_LIMIT).await?;

    Ok(Json(DashboardResponse {
        learner_count,
        instructor_count,
        course_count,
        enrollment_count,
        recent_enrollments,
    }))
}

/// GET /api/v1/admin/reports
///
/// Instructor workload and active-course statistics.
pub async fn reports(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<ReportsResponse>> {
    let instructor_workload = InstructorRepo::workload(&state.pool).await?;
    let active_courses = CourseRepo::active(&state.pool).await?;

    Ok(Json(ReportsResponse {
        instructor_workload,
        active_courses,
    }))
}

// ---------------------------------------------------------------------------
// Learner management
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/learners
pub async fn list_learners(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<DataResponse<Vec<LearnerAccount>>>> {
    let learners = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => LearnerRepo::search(&state.pool, term).await?,
        _ => LearnerRepo::list(&state.pool).await?,
    };
    Ok(Json(DataResponse::new(learners)))
}

/// POST /api/v1/admin/learners
///
/// Provision a learner account + profile in one transaction.
pub async fn create_learner(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateLearnerRequest>,
) -> AppResult<(StatusCode, Json<Learner>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name is required".into(),
        )));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::email_exists(&state.pool, &input.email).await? {
        return Err(AppError::Core(CoreError::Validation(
            "This email is already registered".into(),
        )));
    }

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let learner = LearnerRepo::create(
        &state.pool,
        &CreateLearner {
            name: input.name.trim().to_string(),
            email: input.email,
            phone: input.phone,
            password_hash: hashed,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(learner)))
}

/// GET /api/v1/admin/learners/{id}
///
/// Profile plus the learner's enrollments with progress.
pub async fn get_learner(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<LearnerDetailResponse>> {
    let learner = LearnerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Learner",
            id,
        }))?;

    let enrollments = EnrollmentRepo::list_for_learner(&state.pool, id, None)
        .await?
        .into_iter()
        .map(EnrollmentSummary::from)
        .collect();

    Ok(Json(LearnerDetailResponse {
        learner,
        enrollments,
    }))
}

/// PUT /api/v1/admin/learners/{id}
pub async fn update_learner(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLearnerRequest>,
) -> AppResult<Json<LearnerAccount>> {
    let update = UpdateLearner {
        name: non_empty(input.name),
        phone: non_empty(input.phone),
        email: non_empty(input.email),
    };

    let learner = LearnerRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Learner",
            id,
        }))?;

    Ok(Json(learner))
}

/// DELETE /api/v1/admin/learners/{id}
///
/// Removes the account, profile, enrollments, and view history in one
/// statement.
pub async fn delete_learner(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = LearnerRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Learner",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Instructor management
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/instructors
pub async fn list_instructors(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<DataResponse<Vec<InstructorAccount>>>> {
    let instructors = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => InstructorRepo::search(&state.pool, term).await?,
        _ => InstructorRepo::list(&state.pool).await?,
    };
    Ok(Json(DataResponse::new(instructors)))
}

/// POST /api/v1/admin/instructors
///
/// Provision an instructor account + profile in one transaction. This is
/// the only way instructor accounts come into existence.
pub async fn create_instructor(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateInstructorRequest>,
) -> AppResult<(StatusCode, Json<Instructor>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name is required".into(),
        )));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::email_exists(&state.pool, &input.email).await? {
        return Err(AppError::Core(CoreError::Validation(
            "This email is already registered".into(),
        )));
    }

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let instructor = InstructorRepo::create(
        &state.pool,
        &CreateInstructor {
            name: input.name.trim().to_string(),
            email: input.email,
            expertise: input.expertise,
            password_hash: hashed,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(instructor)))
}

/// GET /api/v1/admin/instructors/{id}
pub async fn get_instructor(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<InstructorAccount>> {
    let instructor = InstructorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Instructor",
            id,
        }))?;
    Ok(Json(instructor))
}

/// PUT /api/v1/admin/instructors/{id}
pub async fn update_instructor(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInstructorRequest>,
) -> AppResult<Json<InstructorAccount>> {
    let update = UpdateInstructor {
        name: non_empty(input.name),
        expertise: non_empty(input.expertise),
        email: non_empty(input.email),
    };

    let instructor = InstructorRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Instructor",
            id,
        }))?;

    Ok(Json(instructor))
}

/// DELETE /api/v1/admin/instructors/{id}
///
/// Removes the account and profile; their courses survive unowned.
pub async fn delete_instructor(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = InstructorRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Instructor",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Course management
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/courses
pub async fn list_courses(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<DataResponse<Vec<CourseListing>>>> {
    let courses = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => CourseRepo::search(&state.pool, term).await?,
        _ => CourseRepo::list(&state.pool).await?,
    };
    Ok(Json(DataResponse::new(courses)))
}

/// POST /api/v1/admin/courses
pub async fn create_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateCourseRequest>,
) -> AppResult<(StatusCode, Json<Course>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Course name is required".into(),
        )));
    }
    if let Some(instructor_id) = input.instructor_id {
        ensure_instructor_exists(&state, instructor_id).await?;
    }

    let course = CourseRepo::create(
        &state.pool,
        &CreateCourse {
            name: input.name.trim().to_string(),
            description: input.description,
            instructor_id: input.instructor_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(course)))
}

/// GET /api/v1/admin/courses/{id}
pub async fn get_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<CourseDetailResponse>> {
    let course = CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;

    let lectures = LectureRepo::by_course(&state.pool, id).await?;

    Ok(Json(CourseDetailResponse { course, lectures }))
}

/// PUT /api/v1/admin/courses/{id}
pub async fn update_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCourseRequest>,
) -> AppResult<Json<Course>> {
    let update = UpdateCourse {
        name: non_empty(input.name),
        description: non_empty(input.description),
    };

    let course = CourseRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;

    Ok(Json(course))
}

/// PUT /api/v1/admin/courses/{id}/instructor
///
/// Assign or clear course ownership. A `null` instructor id leaves the
/// course unowned.
pub async fn assign_instructor(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AssignInstructorRequest>,
) -> AppResult<Json<Course>> {
    if let Some(instructor_id) = input.instructor_id {
        ensure_instructor_exists(&state, instructor_id).await?;
    }

    let course = CourseRepo::assign_instructor(&state.pool, id, input.instructor_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;

    Ok(Json(course))
}

/// DELETE /api/v1/admin/courses/{id}
///
/// Removes the course with its lectures, enrollments, and view history in
/// one statement.
pub async fn delete_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CourseRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/courses/{id}/summary
///
/// Per-learner completion summary for one course. A course without
/// enrollments yields an empty list.
pub async fn course_summary(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<RosterEntry>>>> {
    CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;

    let roster = EnrollmentRepo::course_summary(&state.pool, id)
        .await?
        .into_iter()
        .map(RosterEntry::from)
        .collect();

    Ok(Json(DataResponse::new(roster)))
}

// ---------------------------------------------------------------------------
// Lecture management
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/courses/{id}/lectures
pub async fn add_lecture(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AddLectureRequest>,
) -> AppResult<(StatusCode, Json<Lecture>)> {
    CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;

    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title and content are required".into(),
        )));
    }

    let lecture = LectureRepo::create(
        &state.pool,
        &CreateLecture {
            course_id: id,
            title: input.title.trim().to_string(),
            content: input.content.trim().to_string(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(lecture)))
}

/// GET /api/v1/admin/lectures/{id}
pub async fn get_lecture(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Lecture>> {
    let lecture = LectureRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lecture",
            id,
        }))?;
    Ok(Json(lecture))
}

/// PUT /api/v1/admin/lectures/{id}
pub async fn update_lecture(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLectureRequest>,
) -> AppResult<Json<Lecture>> {
    let update = UpdateLecture {
        title: non_empty(input.title),
        content: non_empty(input.content),
    };

    let lecture = LectureRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lecture",
            id,
        }))?;

    Ok(Json(lecture))
}

/// DELETE /api/v1/admin/lectures/{id}
pub async fn delete_lecture(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = LectureRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Lecture",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject an ownership assignment to a nonexistent instructor before the
/// FK does, so the caller gets a 404 instead of a sanitized 500.
async fn ensure_instructor_exists(state: &AppState, id: DbId) -> AppResult<()> {
    InstructorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Instructor",
            id,
        }))?;
    Ok(())
}
