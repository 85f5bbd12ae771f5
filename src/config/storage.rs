use std::env;
use std::path::PathBuf;

/// Object storage configuration.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Base directory for the local backend.
    pub dir: PathBuf,
    /// Public URL prefix the signed download URLs are built on.
    pub base_url: String,
    /// Maximum accepted upload size in bytes.
    pub max_bytes: usize,
    /// Lifetime of a signed download URL in seconds.
    pub url_ttl_secs: i64,
}

pub const DEFAULT_URL_TTL_SECS: i64 = 3600; // 60 minutes

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("storage/objects")),
            base_url: env::var("STORAGE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/files".to_string()),
            max_bytes: env::var("STORAGE_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            url_ttl_secs: env::var("STORAGE_URL_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_URL_TTL_SECS),
        }
    }
}
