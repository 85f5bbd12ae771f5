use sqlx::PgPool;
use tracing::instrument;

use crate::modules::courses::service::CourseService;
use crate::modules::enrollments::service::EnrollmentService;
use crate::utils::errors::AppError;

use super::model::{Announcement, CreateAnnouncementDto};

const ANNOUNCEMENT_COLUMNS: &str = "id, course_id, title, body, created_at";

pub struct AnnouncementService;

impl AnnouncementService {
    #[instrument(skip(db, dto))]
    pub async fn create_announcement(
        db: &PgPool,
        course_id: i64,
        professor_id: i64,
        dto: CreateAnnouncementDto,
    ) -> Result<Announcement, AppError> {
        CourseService::find_owned(db, course_id, professor_id).await?;

        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            "INSERT INTO announcements (course_id, title, body)
             VALUES ($1, $2, $3)
             RETURNING {ANNOUNCEMENT_COLUMNS}"
        ))
        .bind(course_id)
        .bind(&dto.title)
        .bind(&dto.body)
        .fetch_one(db)
        .await?;

        Ok(announcement)
    }

    #[instrument(skip(db))]
    pub async fn delete_announcement(
        db: &PgPool,
        announcement_id: i64,
        professor_id: i64,
    ) -> Result<(), AppError> {
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements WHERE id = $1"
        ))
        .bind(announcement_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("announcement not found"))?;

        CourseService::find_owned(db, announcement.course_id, professor_id).await?;

        sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(announcement_id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Announcements for a course the student is enrolled in.
    #[instrument(skip(db))]
    pub async fn list_for_enrolled_student(
        db: &PgPool,
        course_id: i64,
        student_id: i64,
    ) -> Result<Vec<Announcement>, AppError> {
        CourseService::find_by_id(db, course_id)
            .await?
            .ok_or_else(|| AppError::not_found("course not found"))?;
        EnrollmentService::ensure_enrolled(db, course_id, student_id).await?;

        let announcements = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements
             WHERE course_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(announcements)
    }
}
