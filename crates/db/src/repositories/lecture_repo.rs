//! Repository for the `lectures` table.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::lecture::{
    CreateLecture, Lecture, LectureTitle, LectureWithViewStatus, UpdateLecture,
};

const COLUMNS: &str = "id, course_id, title, content";

/// Provides CRUD operations for lectures. Ordering is always ascending id,
/// which is creation order.
pub struct LectureRepo;

impl LectureRepo {
    /// Insert a new lecture, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLecture) -> Result<Lecture, sqlx::Error> {
        let query = format!(
            "INSERT INTO lectures (course_id, title, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lecture>(&query)
            .bind(input.course_id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a lecture by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lecture>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lectures WHERE id = $1");
        sqlx::query_as::<_, Lecture>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All lectures of a course in creation order.
    pub async fn by_course(pool: &PgPool, course_id: DbId) -> Result<Vec<Lecture>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lectures WHERE course_id = $1 ORDER BY id");
        sqlx::query_as::<_, Lecture>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Titles only, for the public course page.
    pub async fn titles_by_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<LectureTitle>, sqlx::Error> {
        sqlx::query_as::<_, LectureTitle>(
            "SELECT id, title FROM lectures WHERE course_id = $1 ORDER BY id",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Lectures of a course annotated with one learner's view state.
    pub async fn with_view_status(
        pool: &PgPool,
        learner_id: DbId,
        course_id: DbId,
    ) -> Result<Vec<LectureWithViewStatus>, sqlx::Error> {
        sqlx::query_as::<_, LectureWithViewStatus>(
            "SELECT l.id, l.course_id, l.title,
                    lv.lecture_id IS NOT NULL AS viewed,
                    lv.viewed_at
             FROM lectures l
             LEFT JOIN lecture_views lv
               ON lv.lecture_id = l.id AND lv.learner_id = $1
             WHERE l.course_id = $2
             ORDER BY l.id",
        )
        .bind(learner_id)
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Update title/content. Only non-`None` fields are applied; an update
    /// with nothing supplied returns the unchanged row.
    ///
    /// Returns `None` if no lecture with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLecture,
    ) -> Result<Option<Lecture>, sqlx::Error> {
        let query = format!(
            "UPDATE lectures SET
                title = COALESCE($2, title),
                content = COALESCE($3, content)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lecture>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_optional(pool)
            .await
    }

    /// Delete a lecture; its view rows cascade. Returns `true` if a row was
    /// deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lectures WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
