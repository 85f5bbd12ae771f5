use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

/// An enrollment joined with its course, as listed to the student.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EnrollmentWithCourse {
    pub id: i64,
    pub course_id: i64,
    pub course_title: String,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
