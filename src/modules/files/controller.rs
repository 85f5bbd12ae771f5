use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

use crate::state::AppState;
use crate::storage::ObjectStorage;
use crate::utils::errors::AppError;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DownloadQuery {
    /// The signature issued alongside the URL.
    pub token: Option<String>,
}

/// Redeem a signed download URL
///
/// The local stand-in for the object store's retrieval contract: the
/// token is verified, checked against the requested key, and the object
/// streamed back. Expired or mismatched tokens are refused.
#[utoipa::path(
    get,
    path = "/files/{key}",
    params(("key" = String, Path, description = "Object key"), DownloadQuery),
    responses(
        (status = 200, description = "The stored file"),
        (status = 401, description = "Missing, invalid, or expired token"),
        (status = 404, description = "Object not found")
    ),
    tag = "Files"
)]
#[instrument(skip(state, query))]
pub async fn fetch_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let token = query
        .token
        .ok_or_else(|| AppError::unauthenticated("missing download token"))?;

    let granted_key = state.storage.redeem_token(&token)?;
    if granted_key != key {
        return Err(AppError::unauthenticated(
            "download token does not match this file",
        ));
    }

    let bytes = state.storage.read(&key).await?;

    let file_name = key.rsplit('/').next().unwrap_or("download");
    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
    ];

    Ok((headers, bytes).into_response())
}
