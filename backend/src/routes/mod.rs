mod docs;
pub mod health;
pub mod videos;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};

use crate::types::Environment;

/// Prefix the video routes are additionally mounted under
pub const API_V1_PREFIX: &str = "/api/v1";

/// Video upload, redirect and info routes
fn video_routes() -> ApiRouter {
    ApiRouter::new()
        .api_route("/videos", post(videos::upload_video))
        .api_route("/videos/{id}", get(videos::get_video))
        .api_route("/videos/{id}/info", get(videos::get_video_info))
}

/// Creates the router with all handler routes
///
/// API docs are only mounted where the environment allows them.
pub fn handler(environment: Environment) -> ApiRouter {
    let router = ApiRouter::new()
        .api_route("/", get(health::root))
        .api_route("/health", get(health::handler))
        .merge(video_routes())
        .nest(API_V1_PREFIX, video_routes());

    if environment.show_api_docs() {
        router.merge(docs::handler())
    } else {
        router
    }
}
