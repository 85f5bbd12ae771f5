use sqlx::PgPool;
use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{AccountStatus, Role, User};
use crate::utils::errors::AppError;
use crate::utils::jwt::issue_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{AuthResponse, LoginRequest, RegisterRequestDto};

pub struct AuthService;

impl AuthService {
    /// Create an account and issue a credential.
    ///
    /// Students start `active`; professors start `pending` and the gate
    /// keeps them out of professor capabilities until root approval. The
    /// token is issued either way: it is proof of identity, not a cached
    /// authorization.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn register(
        db: &PgPool,
        dto: RegisterRequestDto,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let role = Role::from(dto.role);
        let status = match role {
            Role::Student => AccountStatus::Active,
            Role::Professor => AccountStatus::Pending,
            // Not representable in RegisterRole; kept for exhaustiveness.
            Role::Root => return Err(AppError::validation("root cannot self-register")),
        };

        let password_hash = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (full_name, email, password_hash, role, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, full_name, email, role, status, created_at, updated_at",
        )
        .bind(&dto.full_name)
        .bind(&dto.email)
        .bind(&password_hash)
        .bind(role)
        .bind(status)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict("an account with this email already exists");
                }
            }
            AppError::internal(e)
        })?;

        let token = issue_token(user.id, &user.email, user.role, jwt_config)?;

        Ok(AuthResponse { token, user })
    }

    /// Verify credentials and issue a token. Both unknown-email and
    /// wrong-password fail with the same generic message: nothing about
    /// the store, the hash, or which half was wrong reaches the client.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: i64,
            full_name: String,
            email: String,
            password_hash: String,
            role: Role,
            status: AccountStatus,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let row = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, full_name, email, password_hash, role, status, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthenticated("invalid email or password"))?;

        if !verify_password(&dto.password, &row.password_hash)? {
            return Err(AppError::unauthenticated("invalid email or password"));
        }

        let token = issue_token(row.id, &row.email, row.role, jwt_config)?;

        Ok(AuthResponse {
            token,
            user: User {
                id: row.id,
                full_name: row.full_name,
                email: row.email,
                role: row.role,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        })
    }
}
