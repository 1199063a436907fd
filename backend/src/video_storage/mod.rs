//! Video storage gateway over an object store and optional CDN
mod blob_store;
mod error;
#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod s3;

use std::collections::HashMap;
use std::sync::Arc;

use aws_sdk_s3::primitives::ByteStream;
use tracing::{error, info};

pub use blob_store::BlobStore;
pub use error::{BlobError, BlobResult, StorageError, StorageResult};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::{InMemoryBlobStore, StoredBlob};
pub use s3::S3BlobStore;

use crate::{types::Settings, video_keys::StorageKey};

/// Content type every video object is written with
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Writes, probes and deletes video objects and resolves their public URLs
pub struct VideoStorage {
    store: Arc<dyn BlobStore>,
    bucket_name: String,
    cdn_domain: Option<String>,
    native_domain_suffix: String,
}

impl VideoStorage {
    /// Creates a new video storage gateway
    ///
    /// # Arguments
    ///
    /// * `store` - Backend the objects live in
    /// * `bucket_name` - Bucket holding the videos
    /// * `cdn_domain` - CDN hostname; empty or `None` serves bucket-native URLs
    /// * `native_domain_suffix` - Suffix of bucket-native URLs, e.g. `s3.amazonaws.com`
    #[must_use]
    pub fn new(
        store: Arc<dyn BlobStore>,
        bucket_name: String,
        cdn_domain: Option<String>,
        native_domain_suffix: String,
    ) -> Self {
        Self {
            store,
            bucket_name,
            cdn_domain: cdn_domain.filter(|domain| !domain.is_empty()),
            native_domain_suffix,
        }
    }

    /// Creates a gateway configured from settings
    #[must_use]
    pub fn from_settings(store: Arc<dyn BlobStore>, settings: &Settings) -> Self {
        Self::new(
            store,
            settings.s3_bucket_name.clone(),
            settings.cdn_domain.clone(),
            settings.s3_domain_suffix.clone(),
        )
    }

    /// Bucket the gateway writes to
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Public URL of `key`, without checking that the object exists
    ///
    /// CDN-prefixed when a CDN hostname is configured, bucket-native otherwise.
    #[must_use]
    pub fn object_url(&self, key: &StorageKey) -> String {
        match &self.cdn_domain {
            Some(cdn_domain) => format!("https://{cdn_domain}/{key}"),
            None => format!(
                "https://{}.{}/{key}",
                self.bucket_name, self.native_domain_suffix
            ),
        }
    }

    /// Stores a video and returns its public URL
    ///
    /// Metadata entries with empty values are dropped. The object is written
    /// as `video/mp4` with a public-read ACL.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Write` if the backend write fails
    pub async fn put_object(
        &self,
        body: ByteStream,
        key: &StorageKey,
        metadata: HashMap<String, String>,
    ) -> StorageResult<String> {
        let metadata: HashMap<String, String> = metadata
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect();

        self.store
            .put(
                &self.bucket_name,
                key.as_str(),
                body,
                VIDEO_CONTENT_TYPE,
                true,
                metadata,
            )
            .await
            .map_err(|e| {
                error!("Error uploading video {key} to {}: {e}", self.bucket_name);
                StorageError::Write(e.to_string())
            })?;

        info!("Uploaded video {key} to bucket {}", self.bucket_name);

        Ok(self.object_url(key))
    }

    /// Confirms the object exists and returns its public URL
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the object is absent
    /// Returns `StorageError::Backend` for any other probe failure
    pub async fn resolve_url(&self, key: &StorageKey) -> StorageResult<String> {
        match self.store.head_exists(&self.bucket_name, key.as_str()).await {
            Ok(()) => Ok(self.object_url(key)),
            Err(BlobError::NotFound(_)) => Err(StorageError::NotFound(key.to_string())),
            Err(BlobError::Backend(msg)) => {
                error!("Error checking existence of video {key}: {msg}");
                Err(StorageError::Backend(msg))
            }
        }
    }

    /// Deletes a video object
    ///
    /// Whether deleting an absent key succeeds is up to the backend.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the backend delete fails
    pub async fn delete_object(&self, key: &StorageKey) -> StorageResult<()> {
        self.store
            .delete(&self.bucket_name, key.as_str())
            .await
            .map_err(|e| {
                error!("Error deleting video {key} from {}: {e}", self.bucket_name);
                StorageError::Backend(e.to_string())
            })?;

        info!("Deleted video {key} from bucket {}", self.bucket_name);
        Ok(())
    }
}
