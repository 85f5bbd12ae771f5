//! User data models and DTOs.
//!
//! The [`Role`] and [`AccountStatus`] enums are the closed tagged-variant
//! types every authorization decision matches on. Both map to PostgreSQL
//! enum types, so an unrecognized value cannot exist past the driver
//! boundary, and every `match` over them is exhaustiveness-checked.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// A principal's role. Set at creation, immutable through this API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Professor,
    Root,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Professor => "professor",
            Role::Root => "root",
        }
    }
}

/// A principal's account status. Mutable only through a root-initiated
/// transition; read fresh from the store on every authorized request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Approved,
    Rejected,
    Active,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Approved => "approved",
            AccountStatus::Rejected => "rejected",
            AccountStatus::Active => "active",
        }
    }

    /// Whether a root-initiated transition from `self` to `to` is valid.
    ///
    /// `rejected -> approved` is allowed: a rejection is reversible by
    /// another explicit root action. No state returns to `pending`, and a
    /// transition must change the state.
    pub fn can_transition_to(self, to: AccountStatus) -> bool {
        use AccountStatus::*;
        match (self, to) {
            (Pending, Approved) | (Pending, Rejected) | (Pending, Active) => true,
            (Approved, Rejected) | (Approved, Active) => true,
            (Rejected, Approved) | (Rejected, Active) => true,
            (Active, Rejected) => true,
            (_, Pending) => false,
            (Approved, Approved) | (Rejected, Rejected) | (Active, Active) => false,
            (Active, Approved) => false,
        }
    }
}

/// A user in the system, as returned by the API.
///
/// The password hash never leaves the service layer; queries that need it
/// select into a private row type instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for a root-initiated status transition.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusDto {
    pub status: AccountStatus,
}

/// Query parameters for filtering the user list.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserFilterParams {
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing users.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Professor).unwrap(), "\"professor\"");
        assert_eq!(serde_json::to_string(&Role::Root).unwrap(), "\"root\"");
        let parsed: Role = serde_json::from_str("\"student\"").unwrap();
        assert_eq!(parsed, Role::Student);
    }

    #[test]
    fn unknown_role_string_is_rejected() {
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AccountStatus::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: AccountStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(parsed, AccountStatus::Rejected);
    }

    #[test]
    fn approval_flow_transitions_are_valid() {
        use AccountStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Active));
        assert!(Approved.can_transition_to(Active));
    }

    #[test]
    fn rejection_is_reversible_by_root() {
        use AccountStatus::*;
        assert!(Rejected.can_transition_to(Approved));
        assert!(Rejected.can_transition_to(Active));
    }

    #[test]
    fn no_state_returns_to_pending() {
        use AccountStatus::*;
        for from in [Pending, Approved, Rejected, Active] {
            assert!(!from.can_transition_to(Pending));
        }
    }

    #[test]
    fn same_state_is_not_a_transition() {
        use AccountStatus::*;
        for s in [Pending, Approved, Rejected, Active] {
            assert!(!s.can_transition_to(s));
        }
    }

    #[test]
    fn active_accounts_can_only_be_rejected() {
        use AccountStatus::*;
        assert!(Active.can_transition_to(Rejected));
        assert!(!Active.can_transition_to(Approved));
        assert!(!Active.can_transition_to(Pending));
    }
}
