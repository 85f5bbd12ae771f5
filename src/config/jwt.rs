use std::env;

use anyhow::{Context, bail};

/// Signing configuration for the session credential.
///
/// The secret is required: a service that cannot verify credentials must
/// refuse to start rather than accept unverifiable tokens.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Credential lifetime in seconds. Expiry is the only invalidation
    /// mechanism besides the per-request status check.
    pub expiry_secs: i64,
}

pub const DEFAULT_EXPIRY_SECS: i64 = 604800; // 7 days

impl JwtConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let expiry_secs = match env::var("JWT_EXPIRY") {
            Ok(v) => v
                .parse::<i64>()
                .context("JWT_EXPIRY must be an integer number of seconds")?,
            Err(_) => DEFAULT_EXPIRY_SECS,
        };

        Ok(Self {
            secret,
            expiry_secs,
        })
    }
}
