use sqlx::PgPool;

use crate::config::bootstrap::BootstrapConfig;
use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;
use crate::config::rate_limit::RateLimitConfig;
use crate::config::storage::StorageConfig;
use crate::storage::LocalObjectStorage;

/// Everything a handler needs, constructed once in `main` and injected
/// through the router. No ambient globals.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub storage: LocalObjectStorage,
    pub bootstrap: BootstrapConfig,
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let jwt = JwtConfig::from_env()?;
    let storage_config = StorageConfig::from_env();
    let storage = LocalObjectStorage::new(&storage_config, &jwt.secret);

    Ok(AppState {
        db: init_db_pool().await?,
        jwt,
        cors: CorsConfig::from_env(),
        rate_limit: RateLimitConfig::from_env(),
        storage,
        bootstrap: BootstrapConfig::from_env(),
    })
}
