use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::{instrument, warn};

use crate::modules::assignments::service::AssignmentService;
use crate::modules::enrollments::service::EnrollmentService;
use crate::storage::{LocalObjectStorage, ObjectStorage};
use crate::utils::errors::AppError;

use super::model::{DownloadUrlResponse, Submission, SubmissionWithStudent};

const SUBMISSION_COLUMNS: &str =
    "id, assignment_id, student_id, file_key, file_name, checksum, grade, submitted_at";

pub struct SubmissionService;

impl SubmissionService {
    /// Upload a file for an assignment.
    ///
    /// Re-submitting replaces the previous upload: the row is upserted
    /// (the unique pair keeps it duplicate-free), the grade resets, and
    /// the replaced object is deleted after the new row is committed.
    #[instrument(skip(db, storage, content))]
    pub async fn submit(
        db: &PgPool,
        storage: &LocalObjectStorage,
        assignment_id: i64,
        student_id: i64,
        file_name: &str,
        content: &[u8],
    ) -> Result<Submission, AppError> {
        let assignment = AssignmentService::find_by_id(db, assignment_id)
            .await?
            .ok_or_else(|| AppError::not_found("assignment not found"))?;
        EnrollmentService::ensure_enrolled(db, assignment.course_id, student_id).await?;

        let previous_key: Option<String> = sqlx::query_scalar(
            "SELECT file_key FROM submissions WHERE assignment_id = $1 AND student_id = $2",
        )
        .bind(assignment_id)
        .bind(student_id)
        .fetch_optional(db)
        .await?;

        let checksum = hex::encode(Sha256::digest(content));
        let key = format!(
            "submissions/{}/{}/{:016x}-{}",
            assignment_id,
            student_id,
            rand::random::<u64>(),
            sanitize_file_name(file_name)
        );
        storage.put(&key, content).await?;

        let submission = sqlx::query_as::<_, Submission>(&format!(
            "INSERT INTO submissions (assignment_id, student_id, file_key, file_name, checksum)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (assignment_id, student_id)
             DO UPDATE SET file_key = $3, file_name = $4, checksum = $5,
                           grade = NULL, submitted_at = NOW()
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(assignment_id)
        .bind(student_id)
        .bind(&key)
        .bind(file_name)
        .bind(&checksum)
        .fetch_one(db)
        .await?;

        if let Some(old_key) = previous_key {
            if old_key != key {
                if let Err(e) = storage.delete(&old_key).await {
                    warn!(key = %old_key, error = ?e, "failed to delete replaced submission file");
                }
            }
        }

        Ok(submission)
    }

    #[instrument(skip(db))]
    pub async fn list_for_student(
        db: &PgPool,
        student_id: i64,
    ) -> Result<Vec<Submission>, AppError> {
        let submissions = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions
             WHERE student_id = $1
             ORDER BY submitted_at DESC"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(submissions)
    }

    /// A signed, time-boxed download URL for the caller's own submission.
    #[instrument(skip(db, storage))]
    pub async fn download_url(
        db: &PgPool,
        storage: &LocalObjectStorage,
        submission_id: i64,
        student_id: i64,
    ) -> Result<DownloadUrlResponse, AppError> {
        let submission = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"
        ))
        .bind(submission_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("submission not found"))?;

        if submission.student_id != student_id {
            return Err(AppError::forbidden("submission belongs to another student"));
        }

        let (url, expires_in) = storage.signed_url(&submission.file_key)?;
        Ok(DownloadUrlResponse { url, expires_in })
    }

    /// Submissions for an assignment the professor owns.
    #[instrument(skip(db))]
    pub async fn list_for_assignment(
        db: &PgPool,
        assignment_id: i64,
        professor_id: i64,
    ) -> Result<Vec<SubmissionWithStudent>, AppError> {
        AssignmentService::find_owned(db, assignment_id, professor_id).await?;

        let submissions = sqlx::query_as::<_, SubmissionWithStudent>(
            "SELECT s.id, s.assignment_id, s.student_id,
                    u.full_name AS student_name, u.email AS student_email,
                    s.file_name, s.checksum, s.grade, s.submitted_at
             FROM submissions s
             JOIN users u ON u.id = s.student_id
             WHERE s.assignment_id = $1
             ORDER BY s.submitted_at",
        )
        .bind(assignment_id)
        .fetch_all(db)
        .await?;

        Ok(submissions)
    }

    /// Grade a submission; ownership runs submission → assignment →
    /// course → professor.
    #[instrument(skip(db))]
    pub async fn grade(
        db: &PgPool,
        submission_id: i64,
        professor_id: i64,
        grade: i16,
    ) -> Result<Submission, AppError> {
        let submission = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"
        ))
        .bind(submission_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("submission not found"))?;

        AssignmentService::find_owned(db, submission.assignment_id, professor_id).await?;

        let graded = sqlx::query_as::<_, Submission>(&format!(
            "UPDATE submissions SET grade = $1 WHERE id = $2 RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(grade)
        .bind(submission_id)
        .fetch_one(db)
        .await?;

        Ok(graded)
    }
}

/// Keep uploaded names storage-safe; the original name is stored verbatim
/// in the row for display.
fn sanitize_file_name(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    // ".." would be rejected as a storage key.
    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", "_");
    }
    if cleaned.trim_matches('.').trim_matches('_').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_sanitized_for_keys() {
        assert_eq!(sanitize_file_name("report v2.pdf"), "report_v2.pdf");
        assert_eq!(sanitize_file_name("ok-name_1.txt"), "ok-name_1.txt");
        assert!(!sanitize_file_name("../../evil").contains(".."));
        assert!(!sanitize_file_name("a..b").contains(".."));
    }

    #[test]
    fn empty_or_dot_names_fall_back() {
        assert_eq!(sanitize_file_name(""), "upload");
        assert_eq!(sanitize_file_name("..."), "upload");
        assert_eq!(sanitize_file_name("???"), "upload");
    }
}
