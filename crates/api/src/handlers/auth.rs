//! Handlers for the `/auth` resource: registration, login, token refresh,
//! logout, and password management.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use lms_core::error::CoreError;
use lms_core::roles::Role;
use lms_core::types::{DbId, Timestamp};
use lms_db::models::learner::{CreateLearner, Learner};
use lms_db::models::session::CreateSession;
use lms_db::models::user::User;
use lms_db::repositories::{InstructorRepo, LearnerRepo, SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, ADMIN_PROFILE_ID,
};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, PasswordMatch,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Minimum password length for registration and password changes.
const MIN_PASSWORD_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register` (learner self-registration).
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: IdentityInfo,
}

/// The resolved identity embedded in [`AuthResponse`] and served by
/// `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct IdentityInfo {
    pub account_id: DbId,
    pub email: String,
    pub role: Role,
    /// Learner or instructor row id; 0 for admins.
    pub profile_id: DbId,
    pub last_login_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Learner self-registration. Instructors and admins have no
/// self-registration path; their accounts are admin-provisioned.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<Learner>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name is required".into(),
        )));
    }
    if input.password != input.confirm_password {
        return Err(AppError::Core(CoreError::Validation(
            "Passwords do not match".into(),
        )));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // Friendly pre-check; the unique constraint on users.email backstops
    // the race.
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

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
/// Absent accounts and wrong passwords produce the identical 401.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let matched = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    let Some(matched) = matched else {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    };

    // First successful match against a legacy plaintext credential retires
    // it: re-hash and store, then this account only ever verifies hashed.
    if matched == PasswordMatch::LegacyPlaintext {
        match hash_password(&input.password) {
            Ok(hashed) => {
                if let Err(e) = UserRepo::update_password(&state.pool, user.id, &hashed).await {
                    tracing::warn!(user_id = user.id, error = %e, "Credential migration failed");
                } else {
                    tracing::info!(user_id = user.id, "Migrated legacy credential to argon2id");
                }
            }
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "Credential migration failed");
            }
        }
    }

    // Best-effort login stamp; a failure here must not fail the login.
    if let Err(e) = UserRepo::record_login(&state.pool, user.id).await {
        tracing::warn!(user_id = user.id, error = %e, "Failed to update last_login_at");
    }

    let role = parse_role(&user)?;
    let profile_id = resolve_profile_id(&state, &user, role).await?;

    let response = create_auth_response(&state, &user, role, profile_id).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_active_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // Token rotation: the old session dies with this exchange.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;

    let role = parse_role(&user)?;
    let profile_id = resolve_profile_id(&state, &user, role).await?;

    let response = create_auth_response(&state, &user, role, profile_id).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated account. Returns 204.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, user.account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// The caller's resolved identity, used by clients to route to the right
/// role dashboard.
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<IdentityInfo>> {
    let account = UserRepo::find_by_id(&state.pool, user.account_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;

    Ok(Json(IdentityInfo {
        account_id: account.id,
        email: account.email,
        role: user.role,
        profile_id: user.profile_id,
        last_login_at: account.last_login_at,
    }))
}

/// POST /api/v1/auth/change-password
///
/// Any authenticated role. Verifies the current credential (including the
/// legacy plaintext form), then stores a fresh argon2id hash.
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    if input.new_password != input.confirm_password {
        return Err(AppError::Core(CoreError::Validation(
            "New passwords do not match".into(),
        )));
    }
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let account = UserRepo::find_by_id(&state.pool, user.account_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;

    let matched = verify_password(&input.current_password, &account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if matched.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Current password is incorrect".into(),
        )));
    }

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.account_id, &hashed).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/forgot-password
///
/// Accepts any email and answers the same way whether or not an account
/// exists, so the endpoint cannot be used to enumerate users.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let known = UserRepo::email_exists(&state.pool, &input.email).await?;
    tracing::info!(known, "Password reset requested");

    Ok(Json(serde_json::json!({
        "message": "If the account exists, password reset instructions have been sent"
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse the stored role name; an unknown value means a corrupted account.
fn parse_role(user: &User) -> AppResult<Role> {
    Role::parse(&user.role)
        .ok_or_else(|| AppError::InternalError(format!("Unknown role for account {}", user.id)))
}

/// Resolve the role-profile id backing an account. Admins have no profile
/// table, so they carry the 0 sentinel.
async fn resolve_profile_id(state: &AppState, user: &User, role: Role) -> AppResult<DbId> {
    match role {
        Role::Learner => LearnerRepo::find_by_user_id(&state.pool, user.id)
            .await?
            .map(|l| l.id)
            .ok_or_else(|| {
                AppError::InternalError(format!("Missing learner profile for account {}", user.id))
            }),
        Role::Instructor => InstructorRepo::find_by_user_id(&state.pool, user.id)
            .await?
            .map(|i| i.id)
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Missing instructor profile for account {}",
                    user.id
                ))
            }),
        Role::Admin => Ok(ADMIN_PROFILE_ID),
    }
}

/// Generate access + refresh tokens, persist a session row, and build the
/// response.
async fn create_auth_response(
    state: &AppState,
    user: &User,
    role: Role,
    profile_id: DbId,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, role.as_str(), profile_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: IdentityInfo {
            account_id: user.id,
            email: user.email.clone(),
            role,
            profile_id,
            last_login_at: user.last_login_at,
        },
    })
}
