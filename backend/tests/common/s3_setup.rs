use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use video_cdn::types::Settings;

use super::test_settings;

/// LocalStack edge endpoint used unless `AWS_ENDPOINT_URL` says otherwise
pub const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

/// Endpoint nothing listens on, so every S3 call fails at dispatch
pub const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:1";

/// Settings pointing the S3 client at `endpoint` with static test credentials
pub fn s3_test_settings(endpoint: &str) -> Settings {
    test_settings(&[
        ("AWS_REGION", "us-east-1"),
        ("AWS_ENDPOINT_URL", endpoint),
        ("AWS_ACCESS_KEY_ID", "test"),
        ("AWS_SECRET_ACCESS_KEY", "test"),
    ])
}

/// Settings for the local S3-compatible endpoint
pub fn localstack_settings() -> Settings {
    let endpoint = std::env::var("AWS_ENDPOINT_URL")
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| LOCALSTACK_ENDPOINT.to_string());
    s3_test_settings(&endpoint)
}

/// S3 client built the same way the binary builds it
pub async fn s3_client(settings: &Settings) -> Arc<S3Client> {
    let s3_config = settings.s3_client_config().await;
    Arc::new(S3Client::from_conf(s3_config))
}

/// Creates a uniquely named bucket and returns its name
pub async fn create_test_bucket(s3_client: &S3Client) -> String {
    let bucket = format!("video-cdn-test-{}", uuid::Uuid::new_v4());
    s3_client
        .create_bucket()
        .bucket(&bucket)
        .send()
        .await
        .expect("Failed to create test bucket");
    bucket
}
