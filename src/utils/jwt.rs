//! Token codec: issue and verify the session credential.
//!
//! Stateless HS256 over a server-wide secret. Verification distinguishes a
//! malformed credential from an expired one so clients get a usable
//! message, but both deny access identically.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::Claims;
use crate::modules::users::model::Role;
use crate::utils::errors::AppError;

/// Why a credential failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Malformed,
    Expired,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AppError::unauthenticated("invalid token"),
            TokenError::Expired => AppError::unauthenticated("token has expired"),
        }
    }
}

pub fn issue_token(
    user_id: i64,
    email: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    if jwt_config.secret.is_empty() {
        return Err(AppError::ServerMisconfigured);
    }

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        role,
        exp: (now + jwt_config.expiry_secs).max(0) as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("failed to sign token: {}", e)))
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    if jwt_config.secret.is_empty() {
        return Err(AppError::ServerMisconfigured);
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired.into(),
        _ => TokenError::Malformed.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".to_string(),
            expiry_secs: 604800,
        }
    }

    #[test]
    fn issue_then_verify_roundtrip() {
        let config = test_config();
        let token = issue_token(7, "prof@example.com", Role::Professor, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "prof@example.com");
        assert_eq!(claims.role, Role::Professor);
    }

    #[test]
    fn expired_token_is_distinguished() {
        // Validation::default() allows 60s leeway, so back-date well past it.
        let config = JwtConfig {
            expiry_secs: -3600,
            ..test_config()
        };
        let token = issue_token(7, "prof@example.com", Role::Professor, &config).unwrap();
        let err = verify_token(&token, &test_config()).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(ref m) if m.contains("expired")));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let err = verify_token("not.a.token", &test_config()).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(ref m) if m.contains("invalid")));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(7, "prof@example.com", Role::Professor, &test_config()).unwrap();
        let other = JwtConfig {
            secret: "different-secret".to_string(),
            expiry_secs: 604800,
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn empty_secret_refuses_to_operate() {
        let config = JwtConfig {
            secret: String::new(),
            expiry_secs: 604800,
        };
        assert!(matches!(
            issue_token(1, "a@b.c", Role::Student, &config),
            Err(AppError::ServerMisconfigured)
        ));
        assert!(matches!(
            verify_token("whatever", &config),
            Err(AppError::ServerMisconfigured)
        ));
    }
}
