use sqlx::PgPool;
use tracing::instrument;

use crate::modules::courses::service::CourseService;
use crate::utils::errors::AppError;

use super::model::{Enrollment, EnrollmentWithCourse};

pub struct EnrollmentService;

impl EnrollmentService {
    #[instrument(skip(db))]
    pub async fn enroll(
        db: &PgPool,
        course_id: i64,
        student_id: i64,
    ) -> Result<Enrollment, AppError> {
        CourseService::find_by_id(db, course_id)
            .await?
            .ok_or_else(|| AppError::not_found("course not found"))?;

        let enrollment = sqlx::query_as::<_, Enrollment>(
            "INSERT INTO enrollments (course_id, student_id)
             VALUES ($1, $2)
             RETURNING id, course_id, student_id, enrolled_at",
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict("already enrolled in this course");
                }
            }
            AppError::internal(e)
        })?;

        Ok(enrollment)
    }

    #[instrument(skip(db))]
    pub async fn list_for_student(
        db: &PgPool,
        student_id: i64,
    ) -> Result<Vec<EnrollmentWithCourse>, AppError> {
        let enrollments = sqlx::query_as::<_, EnrollmentWithCourse>(
            "SELECT e.id, e.course_id, c.title AS course_title, e.enrolled_at
             FROM enrollments e
             JOIN courses c ON c.id = e.course_id
             WHERE e.student_id = $1
             ORDER BY e.enrolled_at",
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(enrollments)
    }

    #[instrument(skip(db))]
    pub async fn is_enrolled(
        db: &PgPool,
        course_id: i64,
        student_id: i64,
    ) -> Result<bool, AppError> {
        let exists: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM enrollments WHERE course_id = $1 AND student_id = $2",
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_optional(db)
        .await?;

        Ok(exists.is_some())
    }

    /// Fail closed: a student acting on a course they are not enrolled in
    /// is denied before any read or write of course content.
    pub async fn ensure_enrolled(
        db: &PgPool,
        course_id: i64,
        student_id: i64,
    ) -> Result<(), AppError> {
        if Self::is_enrolled(db, course_id, student_id).await? {
            Ok(())
        } else {
            Err(AppError::forbidden("not enrolled in this course"))
        }
    }
}
