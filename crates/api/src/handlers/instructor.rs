//! Handlers for the instructor-facing `/instructor` resource.
//!
//! Every handler requires the instructor role; anything that targets a
//! course or lecture goes through the ownership guards in
//! [`crate::authz`], which answer with the same 403 whether the target is
//! missing or owned by someone else.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::types::DbId;
use lms_db::models::course::{Course, CourseListing};
use lms_db::models::instructor::{InstructorAccount, UpdateInstructor};
use lms_db::models::lecture::{CreateLecture, Lecture, UpdateLecture};
use lms_db::repositories::{CourseRepo, EnrollmentRepo, InstructorRepo, LectureRepo};
use serde::{Deserialize, Serialize};

use crate::authz;
use crate::error::{AppError, AppResult};
use crate::handlers::{non_empty, RosterEntry};
use crate::middleware::rbac::RequireInstructor;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response body for `GET /instructor/dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub instructor: InstructorAccount,
    pub courses: Vec<CourseListing>,
}

/// Response body for `GET /instructor/courses/{id}`.
#[derive(Debug, Serialize)]
pub struct OwnedCourseResponse {
    #[serde(flatten)]
    pub course: Course,
    pub lectures: Vec<Lecture>,
    pub roster: Vec<RosterEntry>,
}

/// Request body for `POST /instructor/courses/{id}/lectures`.
#[derive(Debug, Deserialize)]
pub struct AddLectureRequest {
    pub title: String,
    pub content: String,
}

/// Request body for `PUT /instructor/lectures/{id}`. Empty fields are left
/// unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateLectureRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Request body for `PUT /instructor/profile`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub expertise: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/instructor/dashboard
///
/// Profile plus owned courses with their enrollment counts.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireInstructor(user): RequireInstructor,
) -> AppResult<Json<DashboardResponse>> {
    let instructor = profile(&state, user.profile_id).await?;
    let courses = CourseRepo::by_instructor(&state.pool, user.profile_id).await?;

    Ok(Json(DashboardResponse { instructor, courses }))
}

/// GET /api/v1/instructor/courses
pub async fn list_courses(
    State(state): State<AppState>,
    RequireInstructor(user): RequireInstructor,
) -> AppResult<Json<DataResponse<Vec<CourseListing>>>> {
    let courses = CourseRepo::by_instructor(&state.pool, user.profile_id).await?;
    Ok(Json(DataResponse::new(courses)))
}

/// GET /api/v1/instructor/courses/{id}
///
/// One owned course with its lectures and the enrolled-learner roster.
pub async fn course_detail(
    State(state): State<AppState>,
    RequireInstructor(user): RequireInstructor,
    Path(id): Path<DbId>,
) -> AppResult<Json<OwnedCourseResponse>> {
    let course = authz::owned_course(&state.pool, user.profile_id, id).await?;

    let lectures = LectureRepo::by_course(&state.pool, id).await?;
    let roster = EnrollmentRepo::course_summary(&state.pool, id)
        .await?
        .into_iter()
        .map(RosterEntry::from)
        .collect();

    Ok(Json(OwnedCourseResponse {
        course,
        lectures,
        roster,
    }))
}

/// GET /api/v1/instructor/courses/{id}/students
///
/// The enrolled-learner roster with per-learner progress.
pub async fn course_students(
    State(state): State<AppState>,
    RequireInstructor(user): RequireInstructor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<RosterEntry>>>> {
    authz::owned_course(&state.pool, user.profile_id, id).await?;

    let roster = EnrollmentRepo::course_summary(&state.pool, id)
        .await?
        .into_iter()
        .map(RosterEntry::from)
        .collect();

    Ok(Json(DataResponse::new(roster)))
}

/// POST /api/v1/instructor/courses/{id}/lectures
///
/// Add a lecture to an owned course. Title and content are required.
pub async fn add_lecture(
    State(state): State<AppState>,
    RequireInstructor(user): RequireInstructor,
    Path(id): Path<DbId>,
    Json(input): Json<AddLectureRequest>,
) -> AppResult<(StatusCode, Json<Lecture>)> {
    authz::owned_course(&state.pool, user.profile_id, id).await?;

    validate_lecture_fields(&input.title, &input.content)?;

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

/// GET /api/v1/instructor/lectures/{id}
pub async fn get_lecture(
    State(state): State<AppState>,
    RequireInstructor(user): RequireInstructor,
    Path(id): Path<DbId>,
) -> AppResult<Json<Lecture>> {
    let lecture = authz::owned_lecture(&state.pool, user.profile_id, id).await?;
    Ok(Json(lecture))
}

/// PUT /api/v1/instructor/lectures/{id}
///
/// Update title/content of an owned lecture. Omitted or empty fields keep
/// their current value; an empty update is a no-op success.
pub async fn update_lecture(
    State(state): State<AppState>,
    RequireInstructor(user): RequireInstructor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLectureRequest>,
) -> AppResult<Json<Lecture>> {
    authz::owned_lecture(&state.pool, user.profile_id, id).await?;

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

/// DELETE /api/v1/instructor/lectures/{id}
pub async fn delete_lecture(
    State(state): State<AppState>,
    RequireInstructor(user): RequireInstructor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    authz::owned_lecture(&state.pool, user.profile_id, id).await?;

    LectureRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/instructor/profile
pub async fn get_profile(
    State(state): State<AppState>,
    RequireInstructor(user): RequireInstructor,
) -> AppResult<Json<InstructorAccount>> {
    let instructor = profile(&state, user.profile_id).await?;
    Ok(Json(instructor))
}

/// PUT /api/v1/instructor/profile
///
/// Update display name and expertise. Omitted or empty fields keep their
/// current value. Email is not instructor-editable.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireInstructor(user): RequireInstructor,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<InstructorAccount>> {
    let update = UpdateInstructor {
        name: non_empty(input.name),
        expertise: non_empty(input.expertise),
        email: None,
    };

    let instructor = InstructorRepo::update(&state.pool, user.profile_id, &update)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;

    Ok(Json(instructor))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Both lecture fields are required on creation.
fn validate_lecture_fields(title: &str, content: &str) -> AppResult<()> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title and content are required".into(),
        )));
    }
    Ok(())
}

/// Load the acting instructor's profile; a valid token whose profile has
/// been deleted since issuance is treated as no longer authenticated.
async fn profile(state: &AppState, profile_id: DbId) -> AppResult<InstructorAccount> {
    InstructorRepo::find_by_id(&state.pool, profile_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))
}
