//! The access-control gate.
//!
//! Per request, in this order, short-circuiting on the first failure:
//!
//! 1. bearer presence and 2. signature/expiry, both in
//!    [`crate::middleware::auth::AuthUser`] (failures are 401);
//! 3. liveness: the credential's subject must still exist. A fresh SELECT,
//!    so a deleted account loses access before its token expires (401);
//! 4. role match, 5. professor approval, 6. active status: an ordered
//!    pipeline of named predicates over the live principal (failures 403).
//!
//! The credential is never trusted for status: approval or rejection takes
//! effect on the next request, not at token expiry. On success the
//! resolved principal is attached to the request; nothing else is mutated.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::{AccountStatus, Role, User};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// A named action with a fixed allowed-role set. No hierarchy: no role
/// implies another's capabilities.
#[derive(Debug)]
pub struct Capability {
    pub name: &'static str,
    pub allowed_roles: &'static [Role],
    /// Whether the capability additionally requires a live (non-pending,
    /// non-rejected) account. Root is exempt by construction.
    pub require_active: bool,
}

pub const ROOT_CAPABILITY: Capability = Capability {
    name: "root",
    allowed_roles: &[Role::Root],
    require_active: false,
};

pub const PROFESSOR_CAPABILITY: Capability = Capability {
    name: "professor",
    allowed_roles: &[Role::Professor],
    require_active: false,
};

pub const STUDENT_CAPABILITY: Capability = Capability {
    name: "student",
    allowed_roles: &[Role::Student],
    require_active: true,
};

/// Outcome of a single authorization predicate.
pub enum Decision {
    Continue,
    Deny(Denial),
}

/// A specific reason access was denied. Every variant maps to 403.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    RoleNotAllowed { role: Role, capability: &'static str },
    AwaitingApproval,
    ProfessorRejected,
    AccountPending,
    AccountRejected,
}

impl Denial {
    pub fn into_error(self) -> AppError {
        match self {
            Denial::RoleNotAllowed { role, capability } => AppError::forbidden(format!(
                "role {} may not perform {} actions",
                role.as_str(),
                capability
            )),
            Denial::AwaitingApproval => {
                AppError::forbidden("professor account is pending approval")
            }
            Denial::ProfessorRejected => AppError::forbidden("professor account was rejected"),
            Denial::AccountPending => AppError::forbidden("account is pending approval"),
            Denial::AccountRejected => AppError::forbidden("account was rejected"),
        }
    }
}

type Predicate = fn(&User, &Capability) -> Decision;

/// The ordered pipeline for steps 4-6. Composed deterministically: the
/// first denial wins, later predicates never run.
const PIPELINE: &[(&str, Predicate)] = &[
    ("role_match", role_match),
    ("professor_approval", professor_approval),
    ("active_status", active_status),
];

fn role_match(user: &User, capability: &Capability) -> Decision {
    if capability.allowed_roles.contains(&user.role) {
        Decision::Continue
    } else {
        Decision::Deny(Denial::RoleNotAllowed {
            role: user.role,
            capability: capability.name,
        })
    }
}

/// Professors must be approved (or already active) before any gated
/// capability, whatever the capability requires. Skipped for other roles.
fn professor_approval(user: &User, _capability: &Capability) -> Decision {
    if user.role != Role::Professor {
        return Decision::Continue;
    }
    match user.status {
        AccountStatus::Approved | AccountStatus::Active => Decision::Continue,
        AccountStatus::Pending => Decision::Deny(Denial::AwaitingApproval),
        AccountStatus::Rejected => Decision::Deny(Denial::ProfessorRejected),
    }
}

fn active_status(user: &User, capability: &Capability) -> Decision {
    if !capability.require_active || user.role == Role::Root {
        return Decision::Continue;
    }
    match user.status {
        AccountStatus::Approved | AccountStatus::Active => Decision::Continue,
        AccountStatus::Pending => Decision::Deny(Denial::AccountPending),
        AccountStatus::Rejected => Decision::Deny(Denial::AccountRejected),
    }
}

/// Run the predicate pipeline over a live principal.
pub fn decide(user: &User, capability: &Capability) -> Result<(), Denial> {
    for (name, predicate) in PIPELINE {
        if let Decision::Deny(denial) = predicate(user, capability) {
            debug!(
                predicate = %name,
                capability = capability.name,
                user_id = user.id,
                role = user.role.as_str(),
                status = user.status.as_str(),
                "access denied"
            );
            return Err(denial);
        }
    }
    Ok(())
}

/// The resolved principal a successful gate decision attaches to the
/// request. Handlers take it as an extractor.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            AppError::internal(anyhow::anyhow!("gate middleware not applied to this route"))
        })
    }
}

/// Steps 1-3: identify the caller and resolve the live principal.
async fn identify(state: &AppState, parts: &mut Parts) -> Result<User, AppError> {
    let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;

    UserService::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::unauthenticated("account no longer exists"))
}

async fn apply_gate(
    state: AppState,
    req: Request,
    next: Next,
    capability: &'static Capability,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let user = identify(&state, &mut parts).await?;
    decide(&user, capability).map_err(Denial::into_error)?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

pub async fn require_root(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match apply_gate(state, req, next, &ROOT_CAPABILITY).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_professor(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match apply_gate(state, req, next, &PROFESSOR_CAPABILITY).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_student(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match apply_gate(state, req, next, &STUDENT_CAPABILITY).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Identity without a capability: steps 1-3 only. Used by `/api/auth/me`,
/// which must work for a still-pending professor checking their status.
pub async fn require_identified(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let user = match identify(&state, &mut parts).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role, status: AccountStatus) -> User {
        User {
            id: 1,
            full_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role,
            status,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn role_sets_are_disjoint() {
        let root = principal(Role::Root, AccountStatus::Active);
        assert!(decide(&root, &ROOT_CAPABILITY).is_ok());
        assert!(matches!(
            decide(&root, &PROFESSOR_CAPABILITY),
            Err(Denial::RoleNotAllowed { .. })
        ));
        assert!(matches!(
            decide(&root, &STUDENT_CAPABILITY),
            Err(Denial::RoleNotAllowed { .. })
        ));

        let student = principal(Role::Student, AccountStatus::Active);
        assert!(matches!(
            decide(&student, &ROOT_CAPABILITY),
            Err(Denial::RoleNotAllowed { .. })
        ));
        assert!(matches!(
            decide(&student, &PROFESSOR_CAPABILITY),
            Err(Denial::RoleNotAllowed { .. })
        ));
    }

    #[test]
    fn pending_professor_is_held_at_the_approval_gate() {
        let prof = principal(Role::Professor, AccountStatus::Pending);
        assert_eq!(
            decide(&prof, &PROFESSOR_CAPABILITY),
            Err(Denial::AwaitingApproval)
        );
    }

    #[test]
    fn approval_takes_effect_without_reissuing_the_token() {
        // Same principal id, same (hypothetical) token: only the live
        // status differs between the two calls.
        let before = principal(Role::Professor, AccountStatus::Pending);
        let after = User {
            status: AccountStatus::Approved,
            ..before.clone()
        };
        assert!(decide(&before, &PROFESSOR_CAPABILITY).is_err());
        assert!(decide(&after, &PROFESSOR_CAPABILITY).is_ok());
    }

    #[test]
    fn rejected_professor_is_distinguishable_from_pending() {
        let prof = principal(Role::Professor, AccountStatus::Rejected);
        assert_eq!(
            decide(&prof, &PROFESSOR_CAPABILITY),
            Err(Denial::ProfessorRejected)
        );
    }

    #[test]
    fn active_professor_passes() {
        for status in [AccountStatus::Approved, AccountStatus::Active] {
            let prof = principal(Role::Professor, status);
            assert!(decide(&prof, &PROFESSOR_CAPABILITY).is_ok());
        }
    }

    #[test]
    fn rejected_student_is_denied() {
        let student = principal(Role::Student, AccountStatus::Rejected);
        assert_eq!(
            decide(&student, &STUDENT_CAPABILITY),
            Err(Denial::AccountRejected)
        );
    }

    #[test]
    fn pending_student_is_denied_with_its_own_reason() {
        let student = principal(Role::Student, AccountStatus::Pending);
        assert_eq!(
            decide(&student, &STUDENT_CAPABILITY),
            Err(Denial::AccountPending)
        );
    }

    #[test]
    fn role_mismatch_wins_over_status() {
        // Pipeline order: a pending professor hitting a student capability
        // is denied for the role, not the status.
        let prof = principal(Role::Professor, AccountStatus::Pending);
        assert!(matches!(
            decide(&prof, &STUDENT_CAPABILITY),
            Err(Denial::RoleNotAllowed { .. })
        ));
    }

    #[test]
    fn root_is_exempt_from_status_gates() {
        // Root status is not gated even if a row somehow carried a
        // non-active status.
        for status in [
            AccountStatus::Pending,
            AccountStatus::Approved,
            AccountStatus::Rejected,
            AccountStatus::Active,
        ] {
            let root = principal(Role::Root, status);
            assert!(decide(&root, &ROOT_CAPABILITY).is_ok());
        }
    }

    #[test]
    fn denials_map_to_forbidden() {
        let err = Denial::AwaitingApproval.into_error();
        assert!(matches!(err, AppError::Forbidden(ref m) if m.contains("pending approval")));

        let err = Denial::RoleNotAllowed {
            role: Role::Student,
            capability: "root",
        }
        .into_error();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
