use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: String,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAssignmentDto {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Partial update; absent fields keep their value.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAssignmentDto {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
}
