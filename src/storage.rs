//! Object storage for submission attachments.
//!
//! Trait-based so the backend can be swapped without touching the
//! submission handlers. The local backend writes under a base directory
//! and stands in for an external object store's signed-URL contract:
//! download URLs carry a short-lived token bound to the object key, and
//! the public `/files` route redeems them.

use std::path::PathBuf;

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::config::storage::StorageConfig;
use crate::utils::errors::AppError;

/// Claims inside a signed download URL token.
#[derive(Debug, Serialize, Deserialize)]
struct DownloadClaims {
    /// Object key the token is bound to.
    key: String,
    exp: usize,
}

pub trait ObjectStorage: Send + Sync {
    /// Store `content` under `key`, returning the key.
    fn put(
        &self,
        key: &str,
        content: &[u8],
    ) -> impl Future<Output = Result<String, AppError>> + Send;

    /// Delete the object at `key`. Deleting a missing object is not an error.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Read the object at `key`.
    fn read(&self, key: &str) -> impl Future<Output = Result<Vec<u8>, AppError>> + Send;

    /// A time-boxed retrieval URL for `key`, plus its lifetime in seconds.
    fn signed_url(&self, key: &str) -> Result<(String, i64), AppError>;
}

#[derive(Clone, Debug)]
pub struct LocalObjectStorage {
    base_dir: PathBuf,
    base_url: String,
    max_bytes: usize,
    url_ttl_secs: i64,
    signing_secret: String,
}

impl LocalObjectStorage {
    pub fn new(config: &StorageConfig, signing_secret: &str) -> Self {
        Self {
            base_dir: config.dir.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_bytes: config.max_bytes,
            url_ttl_secs: config.url_ttl_secs,
            signing_secret: signing_secret.to_string(),
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Reject keys that could escape the base directory.
    fn validate_key(key: &str) -> Result<(), AppError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(AppError::validation("invalid storage key"));
        }
        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(AppError::validation("invalid storage key"));
        }
        Ok(())
    }

    /// Verify a download token and return the key it grants access to.
    pub fn redeem_token(&self, token: &str) -> Result<String, AppError> {
        let data = decode::<DownloadClaims>(
            token,
            &DecodingKey::from_secret(self.signing_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::unauthenticated("download link has expired")
            }
            _ => AppError::unauthenticated("invalid download link"),
        })?;
        Ok(data.claims.key)
    }
}

impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, key: &str, content: &[u8]) -> Result<String, AppError> {
        Self::validate_key(key)?;

        if content.len() > self.max_bytes {
            return Err(AppError::validation(format!(
                "file exceeds maximum size of {} bytes",
                self.max_bytes
            )));
        }

        let path = self.base_dir.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(AppError::internal)?;
        }
        fs::write(&path, content).await.map_err(AppError::internal)?;

        Ok(key.to_string())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        Self::validate_key(key)?;

        match fs::remove_file(self.base_dir.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(e)),
        }
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>, AppError> {
        Self::validate_key(key)?;

        match fs::read(self.base_dir.join(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::not_found("file not found"))
            }
            Err(e) => Err(AppError::internal(e)),
        }
    }

    fn signed_url(&self, key: &str) -> Result<(String, i64), AppError> {
        Self::validate_key(key)?;

        let claims = DownloadClaims {
            key: key.to_string(),
            exp: (Utc::now().timestamp() + self.url_ttl_secs).max(0) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.signing_secret.as_bytes()),
        )
        .map_err(|e| AppError::internal(anyhow::anyhow!("failed to sign download url: {}", e)))?;

        Ok((
            format!("{}/{}?token={}", self.base_url, key, token),
            self.url_ttl_secs,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage(ttl: i64) -> LocalObjectStorage {
        let config = StorageConfig {
            dir: std::env::temp_dir().join("lectern-storage-tests"),
            base_url: "http://localhost:3000/files".to_string(),
            max_bytes: 64,
            url_ttl_secs: ttl,
        };
        LocalObjectStorage::new(&config, "storage-test-secret")
    }

    #[test]
    fn keys_cannot_traverse_paths() {
        assert!(LocalObjectStorage::validate_key("submissions/1/2/report.pdf").is_ok());
        assert!(LocalObjectStorage::validate_key("../etc/passwd").is_err());
        assert!(LocalObjectStorage::validate_key("/etc/passwd").is_err());
        assert!(LocalObjectStorage::validate_key("a/../../b").is_err());
        assert!(LocalObjectStorage::validate_key("").is_err());
        assert!(LocalObjectStorage::validate_key("sp ace").is_err());
    }

    #[test]
    fn signed_url_redeems_to_its_key() {
        let storage = test_storage(3600);
        let (url, expires_in) = storage.signed_url("submissions/1/2/report.pdf").unwrap();
        assert_eq!(expires_in, 3600);

        let token = url.split("token=").nth(1).unwrap();
        let key = storage.redeem_token(token).unwrap();
        assert_eq!(key, "submissions/1/2/report.pdf");
    }

    #[test]
    fn expired_url_is_refused() {
        // Back-date past the verifier's leeway.
        let storage = test_storage(-3600);
        let (url, _) = storage.signed_url("submissions/1/2/report.pdf").unwrap();
        let token = url.split("token=").nth(1).unwrap();
        let err = storage.redeem_token(token).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(ref m) if m.contains("expired")));
    }

    #[test]
    fn token_from_another_secret_is_refused() {
        let (url, _) = test_storage(3600).signed_url("submissions/1/a.pdf").unwrap();
        let token = url.split("token=").nth(1).unwrap();

        let config = StorageConfig {
            dir: std::env::temp_dir(),
            base_url: "http://localhost:3000/files".to_string(),
            max_bytes: 64,
            url_ttl_secs: 3600,
        };
        let other = LocalObjectStorage::new(&config, "a-different-secret");
        assert!(other.redeem_token(token).is_err());
    }

    #[tokio::test]
    async fn put_read_delete_roundtrip() {
        let storage = test_storage(3600);
        let key = "tests/roundtrip.txt";

        storage.put(key, b"hello").await.unwrap();
        assert_eq!(storage.read(key).await.unwrap(), b"hello");

        storage.delete(key).await.unwrap();
        assert!(matches!(
            storage.read(key).await,
            Err(AppError::NotFound(_))
        ));
        // Deleting again is fine.
        storage.delete(key).await.unwrap();
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let storage = test_storage(3600);
        let big = vec![0u8; 65];
        assert!(matches!(
            storage.put("tests/too-big.bin", &big).await,
            Err(AppError::Validation(_))
        ));
    }
}
