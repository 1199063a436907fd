use std::sync::Arc;

use aide::openapi::{Info, OpenApi};
use axum::{extract::DefaultBodyLimit, http::HeaderValue, Extension, Router};
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::routes;
use crate::{types::Settings, video_storage::VideoStorage};

fn cors_layer(settings: &Settings) -> CorsLayer {
    if settings.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the application router with all layers and shared dependencies
pub fn app(settings: &Settings, video_storage: Arc<VideoStorage>) -> Router {
    let mut openapi = OpenApi {
        info: Info {
            title: "Video CDN".to_string(),
            description: Some("Video hosting backed by S3 and an optional CDN".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Info::default()
        },
        ..OpenApi::default()
    };

    routes::handler(settings.environment)
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(video_storage))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(cors_layer(settings))
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default())
}

/// Starts the server with the given settings and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(settings: Settings, video_storage: Arc<VideoStorage>) -> anyhow::Result<()> {
    let router = app(&settings, video_storage);

    let listener = TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    tracing::info!(
        "🔄 Video CDN backend ({}) started on http://{}",
        settings.environment,
        listener.local_addr()?
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
