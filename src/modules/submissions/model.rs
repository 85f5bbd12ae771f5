use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    /// Object-storage key of the uploaded file.
    pub file_key: String,
    pub file_name: String,
    /// Hex SHA-256 of the uploaded bytes.
    pub checksum: String,
    pub grade: Option<i16>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// A submission joined with its student, as the professor sees it.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SubmissionWithStudent {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub student_email: String,
    pub file_name: String,
    pub checksum: String,
    pub grade: Option<i16>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GradeDto {
    #[validate(range(min = 0, max = 100))]
    pub grade: i16,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadUrlResponse {
    pub url: String,
    /// Seconds until the URL stops working.
    pub expires_in: i64,
}
