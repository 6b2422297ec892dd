//! Repository for the `learners` table and its backing accounts.

use lms_core::roles::ROLE_LEARNER;
use sqlx::PgPool;

use lms_core::types::DbId;

use crate::models::learner::{CreateLearner, Learner, LearnerAccount, UpdateLearner};

const COLUMNS: &str = "id, user_id, name, phone";

/// Joined profile + account columns served to admin and profile views.
const ACCOUNT_COLUMNS: &str = "l.id, l.user_id, l.name, l.phone, u.email, u.last_login_at";

/// Provides CRUD operations for learner profiles. Account and profile are
/// created and deleted together; neither half ever persists alone.
pub struct LearnerRepo;

impl LearnerRepo {
    /// Insert the account and the profile in one transaction, returning the
    /// created profile. Rolls back both on any failure, including a
    /// duplicate email.
    pub async fn create(pool: &PgPool, input: &CreateLearner) -> Result<Learner, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (user_id,): (DbId,) = sqlx::query_as(
            "INSERT INTO users (email, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(ROLE_LEARNER)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO learners (user_id, name, phone)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let learner = sqlx::query_as::<_, Learner>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.phone)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(learner)
    }

    /// Find a profile (with account fields) by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<LearnerAccount>, sqlx::Error> {
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM learners l
             JOIN users u ON u.id = l.user_id
             WHERE l.id = $1"
        );
        sqlx::query_as::<_, LearnerAccount>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by its account ID.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Learner>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM learners WHERE user_id = $1");
        sqlx::query_as::<_, Learner>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List all learners with account fields, newest profile first.
    pub async fn list(pool: &PgPool) -> Result<Vec<LearnerAccount>, sqlx::Error> {
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM learners l
             JOIN users u ON u.id = l.user_id
             ORDER BY l.id DESC"
        );
        sqlx::query_as::<_, LearnerAccount>(&query)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive search over name and email.
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<LearnerAccount>, sqlx::Error> {
        let pattern = format!("%{term}%");
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM learners l
             JOIN users u ON u.id = l.user_id
             WHERE l.name ILIKE $1 OR u.email ILIKE $1
             ORDER BY l.name"
        );
        sqlx::query_as::<_, LearnerAccount>(&query)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// Update profile fields, and the account email when supplied, in one
    /// transaction. Only non-`None` fields are applied; an update with
    /// nothing supplied returns the unchanged row.
    ///
    /// Returns `None` if no profile with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLearner,
    ) -> Result<Option<LearnerAccount>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query_as::<_, Learner>(&format!(
            "UPDATE learners SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone)
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.phone)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(learner) = updated else {
            return Ok(None);
        };

        if let Some(email) = &input.email {
            sqlx::query("UPDATE users SET email = $2 WHERE id = $1")
                .bind(learner.user_id)
                .bind(email)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Self::find_by_id(pool, id).await
    }

    /// Delete the profile through its account. The FK cascade removes the
    /// profile, its enrollments, and its lecture views in the same
    /// statement.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM users WHERE id = (SELECT user_id FROM learners WHERE id = $1)",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of learner profiles.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM learners")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
