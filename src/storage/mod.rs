//! Object storage for media payloads and the URL policy used to hand them out.

#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod s3;

use crate::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

/// Binary object store scoped to one bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;

    /// Time-limited GET link for `key`.
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, AppError>;
}

/// Key for a new upload. The uuid segment keeps repeated filenames apart.
pub fn media_key(filename: &str) -> String {
    format!("media/{}/{}", uuid::Uuid::new_v4(), filename)
}

/// How media URLs are produced. One deployment uses one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlStrategy {
    /// `<base>/<key>`, resolved by a CDN in front of the bucket.
    Path { base: String },
    /// Fresh presigned GET per call.
    Presigned { expires_in: Duration },
}

impl Default for UrlStrategy {
    fn default() -> Self {
        UrlStrategy::Path { base: String::new() }
    }
}

impl UrlStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            UrlStrategy::Path { .. } => "path",
            UrlStrategy::Presigned { .. } => "presigned",
        }
    }

    /// Resolve the URL for `key`. Without an object store a presigned strategy
    /// degrades to a bare path, since there is nothing to sign with.
    pub async fn url_for(&self, objects: Option<&dyn ObjectStore>, key: &str) -> Result<String, AppError> {
        match (self, objects) {
            (UrlStrategy::Presigned { expires_in }, Some(store)) => store.presign_get(key, *expires_in).await,
            (UrlStrategy::Path { base }, _) => Ok(path_url(base, key)),
            (UrlStrategy::Presigned { .. }, None) => Ok(path_url("", key)),
        }
    }
}

fn path_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}
