use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::{Role, User};

/// JWT claims. A point-in-time identity assertion: `role` is stable enough
/// to embed, but authorization always re-reads role and status from the
/// store, so an approval or rejection takes effect before expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

/// Roles a caller may self-register with. `root` is provisioned via the
/// CLI or first-boot seed only, so it is not representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RegisterRole {
    Student,
    Professor,
}

impl From<RegisterRole> for Role {
    fn from(role: RegisterRole) -> Self {
        match role {
            RegisterRole::Student => Role::Student,
            RegisterRole::Professor => Role::Professor,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: RegisterRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Issued on both signup and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_role_cannot_be_root() {
        assert!(serde_json::from_str::<RegisterRole>("\"root\"").is_err());
        assert_eq!(
            serde_json::from_str::<RegisterRole>("\"professor\"").unwrap(),
            RegisterRole::Professor
        );
    }

    #[test]
    fn register_dto_validates_fields() {
        let dto = RegisterRequestDto {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "longenough".to_string(),
            role: RegisterRole::Student,
        };
        assert!(dto.validate().is_ok());

        let bad_email = RegisterRequestDto {
            email: "not-an-email".to_string(),
            ..dto
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        let dto = RegisterRequestDto {
            full_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "short".to_string(),
            role: RegisterRole::Student,
        };
        assert!(dto.validate().is_err());
    }
}
