use aide::axum::IntoApiResponse;
use axum::Json;
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Serialize, JsonSchema)]
pub struct HealthResponse {
    status: String,
    /// Current version of the application
    semver: String,
    /// Commit hash of the current build (if available)
    rev: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct WelcomeResponse {
    message: String,
}

/// Health check endpoint
///
/// Returns the current status and version information of the service.
pub async fn handler() -> impl IntoApiResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        semver: env!("CARGO_PKG_VERSION").to_string(),
        rev: option_env!("GIT_REV").map(ToString::to_string),
    })
}

/// Service banner
pub async fn root() -> impl IntoApiResponse {
    Json(WelcomeResponse {
        message: "Welcome to Video CDN API".to_string(),
    })
}
