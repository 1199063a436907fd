//! In-memory blob store (for testing)

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use super::{BlobError, BlobResult, BlobStore};

/// Object as recorded by [`InMemoryBlobStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Object bytes
    pub body: Bytes,
    /// Content type the object was written with
    pub content_type: String,
    /// Whether a public-read ACL was requested
    pub public_read: bool,
    /// User metadata
    pub metadata: HashMap<String, String>,
}

/// Thread-safe in-memory blob store, keyed by `(bucket, key)`
///
/// A failure message set with [`InMemoryBlobStore::fail_with`] makes every
/// call return `BlobError::Backend` until cleared.
#[derive(Default)]
pub struct InMemoryBlobStore {
    objects: RwLock<HashMap<(String, String), StoredBlob>>,
    failure: RwLock<Option<String>>,
    put_calls: AtomicUsize,
}

impl InMemoryBlobStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an object without going through [`BlobStore::put`]
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Bytes>) {
        self.objects.write().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredBlob {
                body: body.into(),
                content_type: "video/mp4".to_string(),
                public_read: true,
                metadata: HashMap::new(),
            },
        );
    }

    /// Returns a copy of the stored object
    #[must_use]
    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredBlob> {
        self.objects
            .read()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Number of stored objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    /// Whether the store holds no objects
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `put` calls received, failed ones included
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail with `msg`
    pub fn fail_with(&self, msg: &str) {
        *self.failure.write().unwrap() = Some(msg.to_string());
    }

    /// Clears a failure set with [`Self::fail_with`]
    pub fn recover(&self) {
        *self.failure.write().unwrap() = None;
    }

    fn check_failure(&self) -> BlobResult<()> {
        match self.failure.read().unwrap().as_ref() {
            Some(msg) => Err(BlobError::Backend(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
        content_type: &str,
        public_read: bool,
        metadata: HashMap<String, String>,
    ) -> BlobResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let body = body
            .collect()
            .await
            .map_err(|e| BlobError::Backend(e.to_string()))?
            .into_bytes();

        self.objects.write().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredBlob {
                body,
                content_type: content_type.to_string(),
                public_read,
                metadata,
            },
        );
        Ok(())
    }

    async fn head_exists(&self, bucket: &str, key: &str) -> BlobResult<()> {
        self.check_failure()?;

        if self
            .objects
            .read()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
        {
            Ok(())
        } else {
            Err(BlobError::NotFound(key.to_string()))
        }
    }

    async fn delete(&self, bucket: &str, key: &str) -> BlobResult<()> {
        self.check_failure()?;

        self.objects
            .write()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_head() {
        let store = InMemoryBlobStore::new();

        assert_eq!(
            store.head_exists("bucket", "videos/a.mp4").await,
            Err(BlobError::NotFound("videos/a.mp4".to_string()))
        );

        store
            .put(
                "bucket",
                "videos/a.mp4",
                ByteStream::from_static(b"data"),
                "video/mp4",
                true,
                HashMap::new(),
            )
            .await
            .unwrap();

        store.head_exists("bucket", "videos/a.mp4").await.unwrap();
        // buckets are separate namespaces
        assert!(store.head_exists("other", "videos/a.mp4").await.is_err());
        assert_eq!(store.put_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryBlobStore::new();
        store.insert("bucket", "videos/a.mp4", "data");

        store.delete("bucket", "videos/a.mp4").await.unwrap();
        store.delete("bucket", "videos/a.mp4").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = InMemoryBlobStore::new();
        store.insert("bucket", "videos/a.mp4", "data");
        store.fail_with("connection reset");

        assert_eq!(
            store.head_exists("bucket", "videos/a.mp4").await,
            Err(BlobError::Backend("connection reset".to_string()))
        );

        store.recover();
        store.head_exists("bucket", "videos/a.mp4").await.unwrap();
    }
}
