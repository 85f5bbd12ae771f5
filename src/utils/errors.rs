//! Application error taxonomy.
//!
//! Every failure a handler can surface maps to exactly one variant here,
//! and every variant maps to exactly one HTTP status. The wire shape is
//! `{"error": "<category>", "message": "<detail>"}` across the whole API.
//!
//! `Internal` carries the source error for server-side logging only; the
//! client always receives a generic message so store failures never leak
//! connection strings, constraint names, or stack detail.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed, or expired credential, or the principal behind
    /// a valid credential no longer exists.
    Unauthenticated(String),
    /// Authenticated, but the live role/status does not permit the action,
    /// or the resource belongs to someone else.
    Forbidden(String),
    /// Resource absent after authorization passed.
    NotFound(String),
    /// Missing or malformed input fields, or an invalid status transition.
    Validation(String),
    /// Duplicate email, duplicate enrollment, instructor already assigned.
    Conflict(String),
    /// The signing secret is absent. Never caused by request input.
    ServerMisconfigured,
    /// Unexpected store or I/O failure.
    Internal(anyhow::Error),
}

impl AppError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ServerMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::ServerMisconfigured => "server_misconfigured",
            Self::Internal(_) => "internal",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Unauthenticated(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Validation(m)
            | Self::Conflict(m) => m.clone(),
            Self::ServerMisconfigured => "server is not configured for authentication".to_string(),
            Self::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(source) => {
                error!(error = %source, "internal error");
            }
            AppError::ServerMisconfigured => {
                error!("authentication attempted without a signing secret");
            }
            _ => {}
        }

        let body = Json(json!({
            "error": self.category(),
            "message": self.client_message(),
        }));

        (self.status(), body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::internal(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_is_fixed() {
        assert_eq!(
            AppError::unauthenticated("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::ServerMisconfigured.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_error_detail_stays_server_side() {
        let err = AppError::internal(anyhow::anyhow!("password hash mismatch at row 42"));
        assert_eq!(err.client_message(), "internal server error");
    }

    #[test]
    fn categories_match_wire_contract() {
        assert_eq!(AppError::unauthenticated("x").category(), "unauthenticated");
        assert_eq!(AppError::forbidden("x").category(), "forbidden");
        assert_eq!(AppError::conflict("x").category(), "conflict");
        assert_eq!(
            AppError::ServerMisconfigured.category(),
            "server_misconfigured"
        );
    }
}
