use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use crate::modules::users::model::{AccountStatus, Role, User};
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PaginationMeta, PaginationParams};

use super::model::{
    Course, CourseWithEnrollment, CreateCourseDto, PaginatedCourseCatalogResponse,
    PaginatedCoursesResponse,
};

const COURSE_COLUMNS: &str = "id, title, description, professor_id, created_at, updated_at";

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db, dto))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (title, description)
             VALUES ($1, $2)
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(&dto.title)
        .bind(&dto.description)
        .fetch_one(db)
        .await?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(course)
    }

    /// Fetch a course and verify it belongs to `professor_id`. Absence is
    /// 404; someone else's course is 403. Checked before any mutation.
    #[instrument(skip(db))]
    pub async fn find_owned(
        db: &PgPool,
        course_id: i64,
        professor_id: i64,
    ) -> Result<Course, AppError> {
        let course = Self::find_by_id(db, course_id)
            .await?
            .ok_or_else(|| AppError::not_found("course not found"))?;

        if course.professor_id != Some(professor_id) {
            return Err(AppError::forbidden("course is not assigned to you"));
        }

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn list_courses(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedCoursesResponse, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(db)
            .await?;

        let data = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedCoursesResponse {
            data,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn list_for_professor(
        db: &PgPool,
        professor_id: i64,
    ) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE professor_id = $1 ORDER BY id"
        ))
        .bind(professor_id)
        .fetch_all(db)
        .await?;

        Ok(courses)
    }

    /// The catalog a student browses: every course, flagged with whether
    /// the student is already enrolled.
    #[instrument(skip(db))]
    pub async fn catalog_for_student(
        db: &PgPool,
        student_id: i64,
        pagination: PaginationParams,
    ) -> Result<PaginatedCourseCatalogResponse, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(db)
            .await?;

        let data = sqlx::query_as::<_, CourseWithEnrollment>(
            "SELECT c.id, c.title, c.description, c.professor_id,
                    (e.id IS NOT NULL) AS enrolled,
                    c.created_at, c.updated_at
             FROM courses c
             LEFT JOIN enrollments e ON e.course_id = c.id AND e.student_id = $1
             ORDER BY c.id
             LIMIT $2 OFFSET $3",
        )
        .bind(student_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedCourseCatalogResponse {
            data,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    /// Assign a professor to a course.
    ///
    /// Re-assigning the same professor is idempotent: success, no write.
    /// A different professor already holding the course is a conflict
    /// unless `replace` is set.
    #[instrument(skip(db))]
    pub async fn assign_professor(
        db: &PgPool,
        course_id: i64,
        professor_id: i64,
        replace: bool,
    ) -> Result<Course, AppError> {
        let course = Self::find_by_id(db, course_id)
            .await?
            .ok_or_else(|| AppError::not_found("course not found"))?;

        let professor = UserService::find_by_id(db, professor_id)
            .await?
            .filter(|u| u.role == Role::Professor)
            .ok_or_else(|| AppError::validation("professor_id does not name a professor"))?;

        if !professor_can_teach(&professor) {
            return Err(AppError::validation(
                "professor account is not approved for teaching",
            ));
        }

        if course.professor_id == Some(professor_id) {
            return Ok(course);
        }

        if course.professor_id.is_some() && !replace {
            return Err(AppError::conflict("course already has an instructor"));
        }

        let updated = sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses SET professor_id = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(professor_id)
        .bind(course_id)
        .fetch_one(db)
        .await?;

        Ok(updated)
    }

    /// Delete a course and all dependents atomically.
    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: i64) -> Result<(), AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found("course not found"))?;

        let mut tx = db.begin().await?;
        Self::delete_course_in_tx(&mut tx, id).await?;
        tx.commit().await?;

        Ok(())
    }

    /// The deletion steps, isolated so a failure at any step discards all
    /// prior writes in the transaction.
    pub async fn delete_course_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM announcements WHERE course_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            "DELETE FROM submissions
             WHERE assignment_id IN (SELECT id FROM assignments WHERE course_id = $1)",
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        sqlx::query("DELETE FROM assignments WHERE course_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM enrollments WHERE course_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

fn professor_can_teach(professor: &User) -> bool {
    matches!(
        professor.status,
        AccountStatus::Approved | AccountStatus::Active
    )
}
