//! Handlers for the learner-facing `/learner` resource.
//!
//! Every handler here requires the learner role; course and lecture access
//! additionally requires enrollment, checked through the guards in
//! [`crate::authz`].

use axum::extract::{Path, Query, State};
use axum::Json;
use lms_core::error::CoreError;
use lms_core::progress::CourseProgress;
use lms_core::types::DbId;
use lms_db::models::course::{Course, CourseListing};
use lms_db::models::learner::{LearnerAccount, UpdateLearner};
use lms_db::models::lecture::{Lecture, LectureWithViewStatus};
use lms_db::repositories::{CourseRepo, EnrollmentRepo, LearnerRepo, LectureRepo};
use serde::{Deserialize, Serialize};

use crate::authz;
use crate::error::{AppError, AppResult};
use crate::handlers::{non_empty, EnrollmentSummary};
use crate::middleware::rbac::RequireLearner;
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of not-yet-enrolled courses suggested on the dashboard.
const RECOMMENDED_LIMIT: i64 = 3;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string for `GET /learner/courses`.
#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    pub search: Option<String>,
}

/// Response body for `GET /learner/dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub learner: LearnerAccount,
    pub enrollments: Vec<EnrollmentSummary>,
    pub recommended: Vec<CourseListing>,
}

/// Response body for `GET /learner/courses/{id}`.
#[derive(Debug, Serialize)]
pub struct EnrolledCourseResponse {
    #[serde(flatten)]
    pub course: Course,
    pub lectures: Vec<LectureWithViewStatus>,
    pub progress: CourseProgress,
}

/// Request body for `PUT /learner/profile`. Empty fields are left
/// unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/learner/dashboard
///
/// Profile, enrollments with progress, and recommended courses in one
/// round trip.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireLearner(user): RequireLearner,
) -> AppResult<Json<DashboardResponse>> {
    let learner = profile(&state, user.profile_id).await?;

    let enrollments = EnrollmentRepo::list_for_learner(&state.pool, user.profile_id, None)
        .await?
        .into_iter()
        .map(EnrollmentSummary::from)
        .collect();

    let recommended =
        CourseRepo::recommended_for(&state.pool, user.profile_id, RECOMMENDED_LIMIT).await?;

    Ok(Json(DashboardResponse {
        learner,
        enrollments,
        recommended,
    }))
}

/// GET /api/v1/learner/courses
///
/// The learner's enrollments with progress, optionally filtered by
/// `?search=` over course name and description.
pub async fn list_courses(
    State(state): State<AppState>,
    RequireLearner(user): RequireLearner,
    Query(query): Query<CourseListQuery>,
) -> AppResult<Json<DataResponse<Vec<EnrollmentSummary>>>> {
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let enrollments = EnrollmentRepo::list_for_learner(&state.pool, user.profile_id, search)
        .await?
        .into_iter()
        .map(EnrollmentSummary::from)
        .collect();
    Ok(Json(DataResponse::new(enrollments)))
}

/// GET /api/v1/learner/courses/{id}
///
/// An enrolled course with its lectures, each annotated with the learner's
/// view state, plus overall progress. 403 without an enrollment.
pub async fn course_detail(
    State(state): State<AppState>,
    RequireLearner(user): RequireLearner,
    Path(id): Path<DbId>,
) -> AppResult<Json<EnrolledCourseResponse>> {
    authz::enrollment_in_course(&state.pool, user.profile_id, id).await?;

    let course = CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;

    let lectures = LectureRepo::with_view_status(&state.pool, user.profile_id, id).await?;
    let counts = EnrollmentRepo::progress(&state.pool, user.profile_id, id).await?;

    Ok(Json(EnrolledCourseResponse {
        course,
        lectures,
        progress: CourseProgress::from_counts(counts.viewed_count, counts.total_count),
    }))
}

/// GET /api/v1/learner/lectures/{id}
///
/// Open a lecture. Requires enrollment in its course; the first open
/// records the view event, repeats are no-ops.
pub async fn view_lecture(
    State(state): State<AppState>,
    RequireLearner(user): RequireLearner,
    Path(id): Path<DbId>,
) -> AppResult<Json<Lecture>> {
    let lecture = authz::enrolled_lecture(&state.pool, user.profile_id, id).await?;

    EnrollmentRepo::record_view(&state.pool, user.profile_id, lecture.id).await?;

    Ok(Json(lecture))
}

/// GET /api/v1/learner/profile
pub async fn get_profile(
    State(state): State<AppState>,
    RequireLearner(user): RequireLearner,
) -> AppResult<Json<LearnerAccount>> {
    let learner = profile(&state, user.profile_id).await?;
    Ok(Json(learner))
}

/// PUT /api/v1/learner/profile
///
/// Update display name and phone. Omitted or empty fields keep their
/// current value; an empty update is a no-op success. Email is not
/// learner-editable.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireLearner(user): RequireLearner,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<LearnerAccount>> {
    let update = UpdateLearner {
        name: non_empty(input.name),
        phone: non_empty(input.phone),
        email: None,
    };

    let learner = LearnerRepo::update(&state.pool, user.profile_id, &update)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;

    Ok(Json(learner))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the acting learner's profile; a valid token whose profile has been
/// deleted since issuance is treated as no longer authenticated.
async fn profile(state: &AppState, profile_id: DbId) -> AppResult<LearnerAccount> {
    LearnerRepo::find_by_id(&state.pool, profile_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))
}
