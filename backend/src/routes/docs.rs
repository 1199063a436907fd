use aide::{axum::ApiRouter, openapi::OpenApi, scalar::Scalar};
use axum::{routing::get, Extension, Json};

const OPENAPI_PATH: &str = "/openapi.json";

/// Scalar UI at `/docs` and the generated document at `/openapi.json`
pub fn handler() -> ApiRouter {
    let scalar = Scalar::new(OPENAPI_PATH).with_title("Video CDN API Docs");

    ApiRouter::new()
        .route("/docs", scalar.axum_route())
        .route(OPENAPI_PATH, get(openapi_schema))
}

#[allow(clippy::unused_async)]
async fn openapi_schema(Extension(openapi): Extension<OpenApi>) -> Json<OpenApi> {
    Json(openapi)
}
