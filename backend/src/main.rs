use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use tracing_subscriber::{fmt, EnvFilter};
use video_cdn::{
    server,
    types::Settings,
    video_storage::{S3BlobStore, VideoStorage},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;

    // RUST_LOG wins over LOG_LEVEL when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str().to_lowercase()));

    // JSON for staging/production, regular format for development
    if settings.environment.json_logs() {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    let s3_client = Arc::new(S3Client::from_conf(settings.s3_client_config().await));
    let video_storage = Arc::new(VideoStorage::from_settings(
        Arc::new(S3BlobStore::new(s3_client)),
        &settings,
    ));

    tracing::info!(
        "Serving bucket {} via {}",
        settings.s3_bucket_name,
        settings.cdn_domain.as_deref().unwrap_or("bucket-native URLs")
    );

    server::start(settings, video_storage).await
}
