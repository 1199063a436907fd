//! S3 implementation of the blob store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{
    error::SdkError, operation::head_object::HeadObjectError, primitives::ByteStream,
    types::ObjectCannedAcl, Client as S3Client,
};
use tracing::debug;

use super::{BlobError, BlobResult, BlobStore};

/// Blob store backed by an S3 (or S3-compatible) client
pub struct S3BlobStore {
    s3_client: Arc<S3Client>,
}

impl S3BlobStore {
    /// Wraps a pre-configured S3 client
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>) -> Self {
        Self { s3_client }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
        content_type: &str,
        public_read: bool,
        metadata: HashMap<String, String>,
    ) -> BlobResult<()> {
        debug!("Putting object {key} into {bucket}");

        self.s3_client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .set_acl(public_read.then_some(ObjectCannedAcl::PublicRead))
            .set_metadata((!metadata.is_empty()).then_some(metadata))
            .send()
            .await?;

        Ok(())
    }

    async fn head_exists(&self, bucket: &str, key: &str) -> BlobResult<()> {
        let result = self
            .s3_client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), HeadObjectError::NotFound(_))
                    || service_err.raw().status().as_u16() == 404 =>
            {
                Err(BlobError::NotFound(key.to_string()))
            }
            Err(e) => Err(BlobError::from(e)),
        }
    }

    async fn delete(&self, bucket: &str, key: &str) -> BlobResult<()> {
        self.s3_client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        Ok(())
    }
}
