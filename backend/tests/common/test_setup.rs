use axum::{body::Body, http::Request, response::Response, Router};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;
use video_cdn::{
    server,
    types::Settings,
    video_storage::{InMemoryBlobStore, VideoStorage},
};

use super::utils::MultipartBody;

pub const TEST_BUCKET: &str = "test-bucket";
pub const TEST_CDN_DOMAIN: &str = "test-cdn.example.com";

/// Setup tracing for tests
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Settings for tests, with extra variables layered over the defaults
pub fn test_settings(extra: &[(&str, &str)]) -> Settings {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("APP_ENV".to_string(), "development".to_string()),
        ("S3_BUCKET_NAME".to_string(), TEST_BUCKET.to_string()),
    ]);
    for (name, value) in extra {
        vars.insert((*name).to_string(), (*value).to_string());
    }

    Settings::from_vars(|name| vars.get(name).cloned()).expect("valid test settings")
}

/// Router wired to an in-memory blob store
pub struct TestSetup {
    pub router: Router,
    pub settings: Settings,
    pub blob_store: Arc<InMemoryBlobStore>,
    pub video_storage: Arc<VideoStorage>,
}

impl TestSetup {
    /// Setup with the test CDN domain configured
    pub fn new() -> Self {
        Self::with_settings(test_settings(&[("CLOUDFRONT_DOMAIN", TEST_CDN_DOMAIN)]))
    }

    /// Setup serving bucket-native URLs
    pub fn without_cdn() -> Self {
        Self::with_settings(test_settings(&[]))
    }

    pub fn with_settings(settings: Settings) -> Self {
        setup_test_env();

        let blob_store = Arc::new(InMemoryBlobStore::new());
        let video_storage = Arc::new(VideoStorage::from_settings(blob_store.clone(), &settings));
        let router = server::app(&settings, video_storage.clone());

        Self {
            router,
            settings,
            blob_store,
            video_storage,
        }
    }

    /// Stores an object directly in the backing store
    pub fn seed_video(&self, key: &str) {
        self.blob_store.insert(TEST_BUCKET, key, "test video content");
    }

    pub async fn send_multipart_request(
        &self,
        route: &str,
        body: MultipartBody,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", body.content_type())
            .body(Body::from(body.into_bytes()))?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }
}
