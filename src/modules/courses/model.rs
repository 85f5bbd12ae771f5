use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Unassigned courses have no professor yet.
    pub professor_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignProfessorDto {
    pub professor_id: i64,
}

/// `replace=true` lets root reassign a course that already has a
/// different instructor; without it that case is a conflict.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssignQuery {
    #[serde(default)]
    pub replace: bool,
}

/// A course as a student browsing the catalog sees it.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CourseWithEnrollment {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub professor_id: Option<i64>,
    pub enrolled: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CourseFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub data: Vec<Course>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedCourseCatalogResponse {
    pub data: Vec<CourseWithEnrollment>,
    pub meta: PaginationMeta,
}
