use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::middleware::gate::CurrentUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{Announcement, CreateAnnouncementDto};
use super::service::AnnouncementService;

/// Post an announcement to an owned course
#[utoipa::path(
    post,
    path = "/api/professor/courses/{id}/announcements",
    params(("id" = i64, Path, description = "Course id")),
    request_body = CreateAnnouncementDto,
    responses(
        (status = 201, description = "Announcement posted", body = Announcement),
        (status = 403, description = "Course belongs to another professor"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Announcements"
)]
#[instrument(skip(state, user, dto))]
pub async fn create_announcement(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CreateAnnouncementDto>,
) -> Result<(StatusCode, Json<Announcement>), AppError> {
    let announcement =
        AnnouncementService::create_announcement(&state.db, id, user.id, dto).await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

/// Delete an announcement from an owned course
#[utoipa::path(
    delete,
    path = "/api/professor/announcements/{id}",
    params(("id" = i64, Path, description = "Announcement id")),
    responses(
        (status = 204, description = "Announcement deleted"),
        (status = 403, description = "Course belongs to another professor"),
        (status = 404, description = "Announcement not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Announcements"
)]
#[instrument(skip(state, user))]
pub async fn delete_announcement(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    AnnouncementService::delete_announcement(&state.db, id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Announcements for an enrolled course
#[utoipa::path(
    get,
    path = "/api/student/courses/{id}/announcements",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Announcements, newest first", body = [Announcement]),
        (status = 403, description = "Not enrolled in this course"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Announcements"
)]
#[instrument(skip(state, user))]
pub async fn course_announcements(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Announcement>>, AppError> {
    let announcements =
        AnnouncementService::list_for_enrolled_student(&state.db, id, user.id).await?;
    Ok(Json(announcements))
}
