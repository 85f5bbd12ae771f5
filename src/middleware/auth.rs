use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use axum_extra::typed_header::TypedHeaderRejectionReason;

use crate::modules::auth::model::Claims;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor covering the first two gate steps: bearer presence and
/// signature/expiry. The claims it yields are proof of identity only;
/// authorization needs the live principal (see [`crate::middleware::gate`]).
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| match rejection.reason() {
                TypedHeaderRejectionReason::Missing => {
                    AppError::unauthenticated("missing authorization header")
                }
                _ => AppError::unauthenticated("invalid authorization header"),
            })?;

        let claims = verify_token(bearer.token(), &state.jwt)?;

        Ok(AuthUser(claims))
    }
}
