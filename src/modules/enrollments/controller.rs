use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::middleware::gate::CurrentUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

use super::model::{Enrollment, EnrollmentWithCourse};
use super::service::EnrollmentService;

/// Enroll in a course
#[utoipa::path(
    post,
    path = "/api/student/courses/{id}/enroll",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 201, description = "Enrolled", body = Enrollment),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Already enrolled")
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, user))]
pub async fn enroll(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = EnrollmentService::enroll(&state.db, id, user.id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// The caller's enrollments
#[utoipa::path(
    get,
    path = "/api/student/enrollments",
    responses(
        (status = 200, description = "Enrollments with course titles", body = [EnrollmentWithCourse])
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, user))]
pub async fn my_enrollments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<EnrollmentWithCourse>>, AppError> {
    let enrollments = EnrollmentService::list_for_student(&state.db, user.id).await?;
    Ok(Json(enrollments))
}
