use sqlx::PgPool;
use tracing::instrument;

use crate::modules::users::model::{
    AccountStatus, PaginatedUsersResponse, Role, User, UserFilterParams,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const USER_COLUMNS: &str = "id, full_name, email, role, status, created_at, updated_at";

pub struct UserService;

impl UserService {
    /// Liveness lookup for the gate: the account behind a credential must
    /// still exist at request time.
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn list_users(
        db: &PgPool,
        filter: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users
             WHERE ($1::user_role IS NULL OR role = $1)
               AND ($2::account_status IS NULL OR status = $2)",
        )
        .bind(filter.role)
        .bind(filter.status)
        .fetch_one(db)
        .await?;

        let data = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE ($1::user_role IS NULL OR role = $1)
               AND ($2::account_status IS NULL OR status = $2)
             ORDER BY id
             LIMIT $3 OFFSET $4"
        ))
        .bind(filter.role)
        .bind(filter.status)
        .bind(filter.pagination.limit())
        .bind(filter.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedUsersResponse {
            data,
            meta: PaginationMeta::new(total, &filter.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn list_pending_professors(db: &PgPool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE role = 'professor' AND status = 'pending'
             ORDER BY created_at"
        ))
        .fetch_all(db)
        .await?;

        Ok(users)
    }

    /// Root-initiated status transition, checked against the transition
    /// table before any write.
    #[instrument(skip(db))]
    pub async fn update_status(
        db: &PgPool,
        id: i64,
        to: AccountStatus,
    ) -> Result<User, AppError> {
        let user = Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))?;

        if user.role == Role::Root {
            return Err(AppError::forbidden("root account status is immutable"));
        }

        if !user.status.can_transition_to(to) {
            return Err(AppError::validation(format!(
                "cannot transition account status from {} to {}",
                user.status.as_str(),
                to.as_str()
            )));
        }

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET status = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {USER_COLUMNS}"
        ))
        .bind(to)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(updated)
    }

    /// Delete a user and every row that references them, atomically.
    /// A professor's courses survive, unassigned.
    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: i64) -> Result<(), AppError> {
        let user = Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))?;

        if user.role == Role::Root {
            return Err(AppError::forbidden("root account cannot be deleted"));
        }

        let mut tx = db.begin().await?;

        sqlx::query("UPDATE courses SET professor_id = NULL, updated_at = NOW() WHERE professor_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM submissions WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM enrollments WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
