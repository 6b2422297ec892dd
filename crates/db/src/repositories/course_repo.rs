//! Repository for the `courses` table and catalog read models.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{ActiveCourse, Course, CourseListing, CreateCourse, UpdateCourse};

const COLUMNS: &str = "id, name, description, instructor_id";

/// Listing columns: course joined with instructor name and enrollment count.
const LISTING_COLUMNS: &str = "c.id, c.name, c.description, c.instructor_id, \
     i.name AS instructor_name, \
     (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id) AS enrollment_count";

/// Provides CRUD operations and catalog queries for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (name, description, instructor_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.instructor_id)
            .fetch_one(pool)
            .await
    }

    /// Find a course by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the full catalog with instructor names and enrollment counts.
    pub async fn list(pool: &PgPool) -> Result<Vec<CourseListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} FROM courses c
             LEFT JOIN instructors i ON i.id = c.instructor_id
             ORDER BY c.name"
        );
        sqlx::query_as::<_, CourseListing>(&query)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive catalog search over name, description, and
    /// instructor name. A numeric term also matches the course ID.
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<CourseListing>, sqlx::Error> {
        let pattern = format!("%{term}%");
        let id_term: DbId = term.trim().parse().unwrap_or(0);
        let query = format!(
            "SELECT {LISTING_COLUMNS} FROM courses c
             LEFT JOIN instructors i ON i.id = c.instructor_id
             WHERE c.id = $2
                OR c.name ILIKE $1
                OR c.description ILIKE $1
                OR i.name ILIKE $1
             ORDER BY c.name"
        );
        sqlx::query_as::<_, CourseListing>(&query)
            .bind(pattern)
            .bind(id_term)
            .fetch_all(pool)
            .await
    }

    /// Newest courses for the public landing page.
    pub async fn featured(pool: &PgPool, limit: i64) -> Result<Vec<CourseListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} FROM courses c
             LEFT JOIN instructors i ON i.id = c.instructor_id
             ORDER BY c.id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, CourseListing>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Courses a learner is not yet enrolled in, for recommendations.
    pub async fn recommended_for(
        pool: &PgPool,
        learner_id: DbId,
        limit: i64,
    ) -> Result<Vec<CourseListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} FROM courses c
             LEFT JOIN instructors i ON i.id = c.instructor_id
             WHERE c.id NOT IN (SELECT course_id FROM enrollments WHERE learner_id = $1)
             ORDER BY c.id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, CourseListing>(&query)
            .bind(learner_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// All courses owned by one instructor, with enrollment counts.
    pub async fn by_instructor(
        pool: &PgPool,
        instructor_id: DbId,
    ) -> Result<Vec<CourseListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} FROM courses c
             LEFT JOIN instructors i ON i.id = c.instructor_id
             WHERE c.instructor_id = $1
             ORDER BY c.id"
        );
        sqlx::query_as::<_, CourseListing>(&query)
            .bind(instructor_id)
            .fetch_all(pool)
            .await
    }

    /// Update name/description. Only non-`None` fields are applied; an
    /// update with nothing supplied returns the unchanged row.
    ///
    /// Returns `None` if no course with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Assign the course to an instructor, or clear ownership with `None`.
    /// Deliberately a separate operation from [`Self::update`] so a partial
    /// update can never blank the owner by omission.
    pub async fn assign_instructor(
        pool: &PgPool,
        id: DbId,
        instructor_id: Option<DbId>,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET instructor_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(instructor_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a course. Lectures, enrollments, and the lecture views hanging
    /// off them go with it through the FK cascades in the same statement.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of courses.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM courses")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Courses with at least one enrollment, for the admin reports view.
    pub async fn active(pool: &PgPool) -> Result<Vec<ActiveCourse>, sqlx::Error> {
        sqlx::query_as::<_, ActiveCourse>(
            "SELECT c.id, c.name, i.name AS instructor_name,
                    COUNT(e.id) AS enrollment_count
             FROM courses c
             LEFT JOIN instructors i ON i.id = c.instructor_id
             JOIN enrollments e ON e.course_id = c.id
             GROUP BY c.id, i.name
             HAVING COUNT(e.id) > 0
             ORDER BY enrollment_count DESC, c.name",
        )
        .fetch_all(pool)
        .await
    }
}
