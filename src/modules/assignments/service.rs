use sqlx::PgPool;
use tracing::instrument;

use crate::modules::courses::service::CourseService;
use crate::modules::enrollments::service::EnrollmentService;
use crate::utils::errors::AppError;

use super::model::{Assignment, CreateAssignmentDto, UpdateAssignmentDto};

const ASSIGNMENT_COLUMNS: &str =
    "id, course_id, title, description, due_at, created_at, updated_at";

pub struct AssignmentService;

impl AssignmentService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<Assignment>, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(assignment)
    }

    /// Fetch an assignment and verify its course belongs to the calling
    /// professor. Ownership runs through the course row.
    #[instrument(skip(db))]
    pub async fn find_owned(
        db: &PgPool,
        assignment_id: i64,
        professor_id: i64,
    ) -> Result<Assignment, AppError> {
        let assignment = Self::find_by_id(db, assignment_id)
            .await?
            .ok_or_else(|| AppError::not_found("assignment not found"))?;

        CourseService::find_owned(db, assignment.course_id, professor_id).await?;

        Ok(assignment)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_assignment(
        db: &PgPool,
        course_id: i64,
        professor_id: i64,
        dto: CreateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        CourseService::find_owned(db, course_id, professor_id).await?;

        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            "INSERT INTO assignments (course_id, title, description, due_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(course_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.due_at)
        .fetch_one(db)
        .await?;

        Ok(assignment)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_assignment(
        db: &PgPool,
        assignment_id: i64,
        professor_id: i64,
        dto: UpdateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        let existing = Self::find_owned(db, assignment_id, professor_id).await?;

        let title = dto.title.unwrap_or(existing.title);
        let description = dto.description.unwrap_or(existing.description);
        let due_at = dto.due_at.or(existing.due_at);

        let updated = sqlx::query_as::<_, Assignment>(&format!(
            "UPDATE assignments
             SET title = $1, description = $2, due_at = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(&title)
        .bind(&description)
        .bind(due_at)
        .bind(assignment_id)
        .fetch_one(db)
        .await?;

        Ok(updated)
    }

    /// Delete an assignment and its submissions atomically.
    #[instrument(skip(db))]
    pub async fn delete_assignment(
        db: &PgPool,
        assignment_id: i64,
        professor_id: i64,
    ) -> Result<(), AppError> {
        Self::find_owned(db, assignment_id, professor_id).await?;

        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM submissions WHERE assignment_id = $1")
            .bind(assignment_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(assignment_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    /// Assignments for a course the student is enrolled in.
    #[instrument(skip(db))]
    pub async fn list_for_enrolled_student(
        db: &PgPool,
        course_id: i64,
        student_id: i64,
    ) -> Result<Vec<Assignment>, AppError> {
        CourseService::find_by_id(db, course_id)
            .await?
            .ok_or_else(|| AppError::not_found("course not found"))?;
        EnrollmentService::ensure_enrolled(db, course_id, student_id).await?;

        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments
             WHERE course_id = $1
             ORDER BY due_at NULLS LAST, id"
        ))
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(assignments)
    }
}
