//! Repository for the `instructors` table and its backing accounts.

use lms_core::roles::ROLE_INSTRUCTOR;
use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::instructor::{
    CreateInstructor, Instructor, InstructorAccount, InstructorWorkload, UpdateInstructor,
};

const COLUMNS: &str = "id, user_id, name, expertise";

const ACCOUNT_COLUMNS: &str = "i.id, i.user_id, i.name, i.expertise, u.email, u.last_login_at";

/// Provides CRUD operations for instructor profiles. There is no
/// self-registration path; callers are admin-only.
pub struct InstructorRepo;

impl InstructorRepo {
    /// Insert the account and the profile in one transaction, returning the
    /// created profile.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInstructor,
    ) -> Result<Instructor, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (user_id,): (DbId,) = sqlx::query_as(
            "INSERT INTO users (email, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(ROLE_INSTRUCTOR)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO instructors (user_id, name, expertise)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let instructor = sqlx::query_as::<_, Instructor>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.expertise)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(instructor)
    }

    /// Find a profile (with account fields) by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InstructorAccount>, sqlx::Error> {
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM instructors i
             JOIN users u ON u.id = i.user_id
             WHERE i.id = $1"
        );
        sqlx::query_as::<_, InstructorAccount>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by its account ID.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Instructor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instructors WHERE user_id = $1");
        sqlx::query_as::<_, Instructor>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List all instructors with account fields, newest profile first.
    pub async fn list(pool: &PgPool) -> Result<Vec<InstructorAccount>, sqlx::Error> {
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM instructors i
             JOIN users u ON u.id = i.user_id
             ORDER BY i.id DESC"
        );
        sqlx::query_as::<_, InstructorAccount>(&query)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive search over name, expertise, and email.
    pub async fn search(
        pool: &PgPool,
        term: &str,
    ) -> Result<Vec<InstructorAccount>, sqlx::Error> {
        let pattern = format!("%{term}%");
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM instructors i
             JOIN users u ON u.id = i.user_id
             WHERE i.name ILIKE $1 OR i.expertise ILIKE $1 OR u.email ILIKE $1
             ORDER BY i.name"
        );
        sqlx::query_as::<_, InstructorAccount>(&query)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// Update profile fields, and the account email when supplied, in one
    /// transaction. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no profile with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInstructor,
    ) -> Result<Option<InstructorAccount>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query_as::<_, Instructor>(&format!(
            "UPDATE instructors SET
                name = COALESCE($2, name),
                expertise = COALESCE($3, expertise)
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.expertise)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(instructor) = updated else {
            return Ok(None);
        };

        if let Some(email) = &input.email {
            sqlx::query("UPDATE users SET email = $2 WHERE id = $1")
                .bind(instructor.user_id)
                .bind(email)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Self::find_by_id(pool, id).await
    }

    /// Delete the profile through its account. Courses owned by this
    /// instructor keep existing with their owner reference cleared by the
    /// `ON DELETE SET NULL` constraint.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM users WHERE id = (SELECT user_id FROM instructors WHERE id = $1)",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of instructor profiles.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM instructors")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Workload statistics for every instructor: courses owned, distinct
    /// learners enrolled across them, and lectures authored.
    pub async fn workload(pool: &PgPool) -> Result<Vec<InstructorWorkload>, sqlx::Error> {
        sqlx::query_as::<_, InstructorWorkload>(
            "SELECT i.id, i.name, i.expertise,
                    COUNT(DISTINCT c.id) AS course_count,
                    COUNT(DISTINCT e.learner_id) AS learner_count,
                    COUNT(DISTINCT lec.id) AS lecture_count
             FROM instructors i
             LEFT JOIN courses c ON c.instructor_id = i.id
             LEFT JOIN enrollments e ON e.course_id = c.id
             LEFT JOIN lectures lec ON lec.course_id = c.id
             GROUP BY i.id
             ORDER BY i.name",
        )
        .fetch_all(pool)
        .await
    }
}
