use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::middleware::gate::CurrentUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{Assignment, CreateAssignmentDto, UpdateAssignmentDto};
use super::service::AssignmentService;

/// Create an assignment in an owned course
#[utoipa::path(
    post,
    path = "/api/professor/courses/{id}/assignments",
    params(("id" = i64, Path, description = "Course id")),
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 403, description = "Course belongs to another professor"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
#[instrument(skip(state, user, dto))]
pub async fn create_assignment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CreateAssignmentDto>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    let assignment = AssignmentService::create_assignment(&state.db, id, user.id, dto).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Update an owned assignment
#[utoipa::path(
    put,
    path = "/api/professor/assignments/{id}",
    params(("id" = i64, Path, description = "Assignment id")),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = Assignment),
        (status = 403, description = "Assignment belongs to another professor"),
        (status = 404, description = "Assignment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
#[instrument(skip(state, user, dto))]
pub async fn update_assignment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateAssignmentDto>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = AssignmentService::update_assignment(&state.db, id, user.id, dto).await?;
    Ok(Json(assignment))
}

/// Delete an owned assignment and its submissions
#[utoipa::path(
    delete,
    path = "/api/professor/assignments/{id}",
    params(("id" = i64, Path, description = "Assignment id")),
    responses(
        (status = 204, description = "Assignment deleted"),
        (status = 403, description = "Assignment belongs to another professor"),
        (status = 404, description = "Assignment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
#[instrument(skip(state, user))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    AssignmentService::delete_assignment(&state.db, id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Assignments for an enrolled course
#[utoipa::path(
    get,
    path = "/api/student/courses/{id}/assignments",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Assignments, nearest due date first", body = [Assignment]),
        (status = 403, description = "Not enrolled in this course"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
#[instrument(skip(state, user))]
pub async fn course_assignments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Assignment>>, AppError> {
    let assignments =
        AssignmentService::list_for_enrolled_student(&state.db, id, user.id).await?;
    Ok(Json(assignments))
}
