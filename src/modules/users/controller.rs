use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{PaginatedUsersResponse, UpdateStatusDto, User, UserFilterParams};
use super::service::UserService;

/// List users, filterable by role and status
#[utoipa::path(
    get,
    path = "/api/root/users",
    responses(
        (status = 200, description = "Paginated user list", body = PaginatedUsersResponse),
        (status = 401, description = "Missing or invalid credential"),
        (status = 403, description = "Caller is not root")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilterParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    let users = UserService::list_users(&state.db, filter).await?;
    Ok(Json(users))
}

/// List professors awaiting approval
#[utoipa::path(
    get,
    path = "/api/root/users/pending",
    responses(
        (status = 200, description = "Professors with pending status", body = [User]),
        (status = 401, description = "Missing or invalid credential"),
        (status = 403, description = "Caller is not root")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn list_pending_professors(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::list_pending_professors(&state.db).await?;
    Ok(Json(users))
}

/// Transition an account's status
#[utoipa::path(
    patch,
    path = "/api/root/users/{id}/status",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid status transition"),
        (status = 403, description = "Caller is not root, or target is root"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateStatusDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_status(&state.db, id, dto.status).await?;
    Ok(Json(user))
}

/// Delete a user and all rows referencing them
#[utoipa::path(
    delete,
    path = "/api/root/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Caller is not root, or target is root"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    UserService::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
