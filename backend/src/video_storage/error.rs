//! Error types for video storage operations

use aws_sdk_s3::{
    error::{DisplayErrorContext, SdkError},
    operation::{
        delete_object::DeleteObjectError, head_object::HeadObjectError,
        put_object::PutObjectError,
    },
};
use thiserror::Error;

/// Result type for blob store calls
pub type BlobResult<T> = Result<T, BlobError>;

/// Result type for gateway operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors reported by a blob store backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlobError {
    /// No object under the probed key
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Any other backend failure (credentials, network, throttling, ...)
    #[error("Object store error: {0}")]
    Backend(String),
}

impl From<SdkError<HeadObjectError>> for BlobError {
    fn from(error: SdkError<HeadObjectError>) -> Self {
        Self::Backend(DisplayErrorContext(&error).to_string())
    }
}

impl From<SdkError<PutObjectError>> for BlobError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        Self::Backend(DisplayErrorContext(&error).to_string())
    }
}

impl From<SdkError<DeleteObjectError>> for BlobError {
    fn from(error: SdkError<DeleteObjectError>) -> Self {
        Self::Backend(DisplayErrorContext(&error).to_string())
    }
}

/// Errors surfaced by the video storage gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The video object does not exist
    #[error("Video file {0} does not exist in bucket")]
    NotFound(String),

    /// Writing the video object failed
    #[error("Failed to store video: {0}")]
    Write(String),

    /// Probing or deleting the video object failed
    #[error("Storage error: {0}")]
    Backend(String),
}
