//! Object store backend seam

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use super::BlobResult;

/// Minimal blob store the gateway depends on
///
/// Implementations hold no per-call state and are shared across requests.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `body` under `key`, replacing any existing object
    ///
    /// The body is streamed; callers never need the whole object in memory.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
        content_type: &str,
        public_read: bool,
        metadata: HashMap<String, String>,
    ) -> BlobResult<()>;

    /// Probes for an object
    ///
    /// Returns `BlobError::NotFound` when the key is absent and
    /// `BlobError::Backend` for any other failure.
    async fn head_exists(&self, bucket: &str, key: &str) -> BlobResult<()>;

    /// Deletes an object
    async fn delete(&self, bucket: &str, key: &str) -> BlobResult<()>;
}
