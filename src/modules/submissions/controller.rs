use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::middleware::gate::CurrentUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{DownloadUrlResponse, GradeDto, Submission, SubmissionWithStudent};
use super::service::SubmissionService;

/// Submit a file for an assignment
#[utoipa::path(
    post,
    path = "/api/student/assignments/{id}/submissions",
    params(("id" = i64, Path, description = "Assignment id")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Submission stored; re-submission replaces the file", body = Submission),
        (status = 400, description = "Missing file field or file too large"),
        (status = 403, description = "Not enrolled in the assignment's course"),
        (status = 404, description = "Assignment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
#[instrument(skip(state, user, multipart))]
pub async fn submit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let file_name = field
                .file_name()
                .unwrap_or("upload")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("failed to read upload: {}", e)))?;
            upload = Some((file_name, bytes.to_vec()));
            break;
        }
    }

    let (file_name, content) =
        upload.ok_or_else(|| AppError::validation("multipart field 'file' is required"))?;

    let submission = SubmissionService::submit(
        &state.db,
        &state.storage,
        id,
        user.id,
        &file_name,
        &content,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(submission)))
}

/// The caller's submissions
#[utoipa::path(
    get,
    path = "/api/student/submissions",
    responses(
        (status = 200, description = "Submissions, newest first", body = [Submission])
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
#[instrument(skip(state, user))]
pub async fn my_submissions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Submission>>, AppError> {
    let submissions = SubmissionService::list_for_student(&state.db, user.id).await?;
    Ok(Json(submissions))
}

/// A time-boxed download URL for an own submission
#[utoipa::path(
    get,
    path = "/api/student/submissions/{id}/download",
    params(("id" = i64, Path, description = "Submission id")),
    responses(
        (status = 200, description = "Signed URL, valid for 60 minutes", body = DownloadUrlResponse),
        (status = 403, description = "Submission belongs to another student"),
        (status = 404, description = "Submission not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
#[instrument(skip(state, user))]
pub async fn download_url(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<DownloadUrlResponse>, AppError> {
    let response =
        SubmissionService::download_url(&state.db, &state.storage, id, user.id).await?;
    Ok(Json(response))
}

/// Submissions for an owned assignment
#[utoipa::path(
    get,
    path = "/api/professor/assignments/{id}/submissions",
    params(("id" = i64, Path, description = "Assignment id")),
    responses(
        (status = 200, description = "Submissions with student info", body = [SubmissionWithStudent]),
        (status = 403, description = "Assignment belongs to another professor"),
        (status = 404, description = "Assignment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
#[instrument(skip(state, user))]
pub async fn assignment_submissions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<SubmissionWithStudent>>, AppError> {
    let submissions = SubmissionService::list_for_assignment(&state.db, id, user.id).await?;
    Ok(Json(submissions))
}

/// Grade a submission
#[utoipa::path(
    patch,
    path = "/api/professor/submissions/{id}/grade",
    params(("id" = i64, Path, description = "Submission id")),
    request_body = GradeDto,
    responses(
        (status = 200, description = "Graded submission", body = Submission),
        (status = 400, description = "Grade out of range"),
        (status = 403, description = "Submission's assignment belongs to another professor"),
        (status = 404, description = "Submission not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Submissions"
)]
#[instrument(skip(state, user))]
pub async fn grade_submission(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<GradeDto>,
) -> Result<Json<Submission>, AppError> {
    let submission = SubmissionService::grade(&state.db, id, user.id, dto.grade).await?;
    Ok(Json(submission))
}
