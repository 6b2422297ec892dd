//! Repository for enrollments and lecture views: the progress bookkeeping.
//!
//! Enroll and record-view are idempotent; unenroll removes the enrollment
//! and the learner's view rows for that course in one transaction.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::enrollment::{
    CourseRosterRow, Enrollment, EnrollmentProgress, ProgressCounts, RecentEnrollment,
};

const COLUMNS: &str = "id, learner_id, course_id, enrolled_at";

/// Subquery pair shared by the progress read models.
const PROGRESS_COUNTS: &str = "\
     (SELECT COUNT(*) FROM lecture_views lv
       JOIN lectures l ON l.id = lv.lecture_id
      WHERE lv.learner_id = e.learner_id AND l.course_id = e.course_id) AS viewed_count, \
     (SELECT COUNT(*) FROM lectures l WHERE l.course_id = e.course_id) AS total_count";

/// Links learners to courses and tracks per-lecture view events.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Enroll a learner in a course. Idempotent: enrolling twice leaves a
    /// single row and both calls return it. No capacity or prerequisite
    /// checks exist.
    pub async fn enroll(
        pool: &PgPool,
        learner_id: DbId,
        course_id: DbId,
    ) -> Result<Enrollment, sqlx::Error> {
        let insert = format!(
            "INSERT INTO enrollments (learner_id, course_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_enrollments_learner_course DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Enrollment>(&insert)
            .bind(learner_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(enrollment) => Ok(enrollment),
            // Conflict path: the pair already exists, return it.
            None => {
                let select = format!(
                    "SELECT {COLUMNS} FROM enrollments
                     WHERE learner_id = $1 AND course_id = $2"
                );
                sqlx::query_as::<_, Enrollment>(&select)
                    .bind(learner_id)
                    .bind(course_id)
                    .fetch_one(pool)
                    .await
            }
        }
    }

    /// Find the enrollment for a (learner, course) pair.
    pub async fn find(
        pool: &PgPool,
        learner_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments WHERE learner_id = $1 AND course_id = $2"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(learner_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// Remove an enrollment and every view row the learner holds for that
    /// course's lectures, all or nothing.
    ///
    /// Returns `false` (and removes nothing) when no enrollment exists.
    pub async fn unenroll(
        pool: &PgPool,
        learner_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM lecture_views
             WHERE learner_id = $1
               AND lecture_id IN (SELECT id FROM lectures WHERE course_id = $2)",
        )
        .bind(learner_id)
        .bind(course_id)
        .execute(&mut *tx)
        .await?;

        let result =
            sqlx::query("DELETE FROM enrollments WHERE learner_id = $1 AND course_id = $2")
                .bind(learner_id)
                .bind(course_id)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Record that a learner opened a lecture. Idempotent: repeat views keep
    /// the original timestamp. Enrollment is the caller's responsibility to
    /// check before this point.
    pub async fn record_view(
        pool: &PgPool,
        learner_id: DbId,
        lecture_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO lecture_views (learner_id, lecture_id)
             VALUES ($1, $2)
             ON CONFLICT (learner_id, lecture_id) DO NOTHING",
        )
        .bind(learner_id)
        .bind(lecture_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Viewed/total lecture counts for a (learner, course) pair. Counts are
    /// zero when the course has no lectures or the pair has no views.
    pub async fn progress(
        pool: &PgPool,
        learner_id: DbId,
        course_id: DbId,
    ) -> Result<ProgressCounts, sqlx::Error> {
        sqlx::query_as::<_, ProgressCounts>(
            "SELECT
                (SELECT COUNT(*) FROM lecture_views lv
                  JOIN lectures l ON l.id = lv.lecture_id
                 WHERE lv.learner_id = $1 AND l.course_id = $2) AS viewed_count,
                (SELECT COUNT(*) FROM lectures WHERE course_id = $2) AS total_count",
        )
        .bind(learner_id)
        .bind(course_id)
        .fetch_one(pool)
        .await
    }

    /// All of a learner's enrollments with course metadata and progress
    /// counts, optionally filtered by a search term over the course name
    /// and description.
    pub async fn list_for_learner(
        pool: &PgPool,
        learner_id: DbId,
        search: Option<&str>,
    ) -> Result<Vec<EnrollmentProgress>, sqlx::Error> {
        let pattern = search.map(|term| format!("%{term}%"));
        let query = format!(
            "SELECT e.id AS enrollment_id, e.course_id, c.name AS course_name,
                    c.description AS course_description, i.name AS instructor_name,
                    e.enrolled_at, {PROGRESS_COUNTS}
             FROM enrollments e
             JOIN courses c ON c.id = e.course_id
             LEFT JOIN instructors i ON i.id = c.instructor_id
             WHERE e.learner_id = $1
               AND ($2::text IS NULL OR c.name ILIKE $2 OR c.description ILIKE $2)
             ORDER BY e.enrolled_at DESC"
        );
        sqlx::query_as::<_, EnrollmentProgress>(&query)
            .bind(learner_id)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// Every enrolled learner of a course with name, enrollment date, and
    /// progress counts. A course with no enrollments yields an empty list.
    pub async fn course_summary(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<CourseRosterRow>, sqlx::Error> {
        let query = format!(
            "SELECT e.id AS enrollment_id, e.learner_id, s.name AS learner_name,
                    e.enrolled_at, {PROGRESS_COUNTS}
             FROM enrollments e
             JOIN learners s ON s.id = e.learner_id
             WHERE e.course_id = $1
             ORDER BY s.name"
        );
        sqlx::query_as::<_, CourseRosterRow>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Newest enrollments with learner and course names, for the admin
    /// dashboard.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<RecentEnrollment>, sqlx::Error> {
        sqlx::query_as::<_, RecentEnrollment>(
            "SELECT e.id, s.name AS learner_name, c.name AS course_name, e.enrolled_at
             FROM enrollments e
             JOIN learners s ON s.id = e.learner_id
             JOIN courses c ON c.id = e.course_id
             ORDER BY e.enrolled_at DESC, e.id DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Total number of enrollments.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM enrollments")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
