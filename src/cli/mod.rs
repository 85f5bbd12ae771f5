//! Administrative commands.
//!
//! The root role is never creatable through the API; it comes from the
//! `create-root` CLI command or from the first-boot seed in the
//! environment.

use sqlx::PgPool;
use tracing::info;

use crate::config::bootstrap::BootstrapConfig;
use crate::modules::users::model::{AccountStatus, Role};
use crate::utils::password::hash_password;

pub async fn create_root(
    db: &PgPool,
    full_name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let password_hash =
        hash_password(password).map_err(|_| anyhow::anyhow!("failed to hash password"))?;

    let result = sqlx::query(
        "INSERT INTO users (full_name, email, password_hash, role, status)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(full_name)
    .bind(email)
    .bind(&password_hash)
    .bind(Role::Root)
    .bind(AccountStatus::Active)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        anyhow::bail!("a user with this email already exists");
    }

    Ok(())
}

/// First-boot provisioning: create the seeded root account when no root
/// principal exists yet. A no-op otherwise.
pub async fn provision_root_if_missing(
    db: &PgPool,
    bootstrap: &BootstrapConfig,
) -> anyhow::Result<()> {
    let root_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'root'")
        .fetch_one(db)
        .await?;

    if root_count > 0 {
        return Ok(());
    }

    let Some((full_name, email, password)) = bootstrap.seed() else {
        return Ok(());
    };

    create_root(db, full_name, email, password).await?;
    info!(email = %email, "provisioned root account from first-boot seed");

    Ok(())
}
