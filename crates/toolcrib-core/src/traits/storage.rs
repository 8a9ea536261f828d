//! Blob storage trait for generated artifacts (QR images).

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for blob storage backends.
///
/// The trait is defined here in `toolcrib-core` and implemented in
/// `toolcrib-storage`. Paths are relative, `/`-separated keys.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write bytes at `path`, replacing any existing object.
    async fn put(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Read the object at `path`.
    async fn get(&self, path: &str) -> AppResult<Bytes>;

    /// Delete the object at `path`. Returns `false` when nothing was there.
    async fn delete(&self, path: &str) -> AppResult<bool>;

    /// Check whether an object exists at `path`.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
