use std::collections::HashMap;
use std::sync::Arc;

use aide::{
    generate::GenContext,
    openapi::{Operation, Response as OpenApiResponse},
    OperationOutput,
};
use aws_sdk_s3::primitives::ByteStream;
use axum::{
    extract::{multipart::Field, Multipart, Path},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

use crate::{
    types::AppError,
    video_keys::{derive_lookup_key, derive_upload_key, VideoIdentifier, DEFAULT_FILENAME},
    video_storage::VideoStorage,
};

/// Description returned by the info endpoint until real metadata is stored
pub const PLACEHOLDER_DESCRIPTION: &str = "Video description would be fetched from database";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    /// Identifier to look the video up with
    pub id: String,
    /// Key of the object in the bucket
    pub storage_key: String,
    /// Public URL of the video (CDN or bucket)
    pub url: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VideoMetadata {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
}

/// Temporary (307) redirect to a resolved video URL
pub struct VideoRedirect(Redirect);

impl IntoResponse for VideoRedirect {
    fn into_response(self) -> Response {
        self.0.into_response()
    }
}

impl OperationOutput for VideoRedirect {
    type Inner = ();

    fn operation_response(
        _ctx: &mut GenContext,
        _operation: &mut Operation,
    ) -> Option<OpenApiResponse> {
        Some(OpenApiResponse {
            description: "307 redirect to the video URL".to_string(),
            ..OpenApiResponse::default()
        })
    }
}

/// File part spooled to disk so the upload is never held in memory
struct UploadedFile {
    filename: String,
    spool: NamedTempFile,
}

fn malformed(err: impl std::fmt::Display) -> AppError {
    AppError::invalid_input(format!("Malformed multipart body: {err}"))
}

fn spool_error(err: impl std::fmt::Display) -> AppError {
    tracing::error!("Failed to spool upload to disk: {err}");
    AppError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "upload_spool_error",
        "Error uploading video",
        true,
    )
}

/// Copies a multipart field chunk by chunk into a temporary file
async fn spool_field(mut field: Field<'_>) -> Result<NamedTempFile, AppError> {
    let spool = NamedTempFile::new().map_err(spool_error)?;
    let mut file = tokio::fs::File::from_std(spool.reopen().map_err(spool_error)?);

    while let Some(chunk) = field.chunk().await.map_err(malformed)? {
        file.write_all(&chunk).await.map_err(spool_error)?;
    }
    file.flush().await.map_err(spool_error)?;

    Ok(spool)
}

/// Uploads a video
///
/// Accepts a multipart form with a `file` part and optional `title` and
/// `description` parts, stores the file under a freshly generated
/// identifier and returns where it can be fetched from.
///
/// # Errors
///
/// - `400 BAD_REQUEST` - file is not a video, missing, or the form is malformed
/// - `500 INTERNAL_SERVER_ERROR` - the upload could not be spooled or the
///   object store rejected the write
#[instrument(skip(video_storage, multipart))]
pub async fn upload_video(
    Extension(video_storage): Extension<Arc<VideoStorage>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<VideoResponse>), AppError> {
    let mut file = None;
    let mut title = None;
    let mut description = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !content_type.starts_with("video/") {
                    return Err(AppError::invalid_input("File must be a video"));
                }

                let filename = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .unwrap_or(DEFAULT_FILENAME)
                    .to_string();
                let spool = spool_field(field).await?;

                file = Some(UploadedFile { filename, spool });
            }
            "title" => title = Some(field.text().await.map_err(malformed)?),
            "description" => description = Some(field.text().await.map_err(malformed)?),
            _ => tracing::debug!("Ignoring unknown form field: {name}"),
        }
    }

    let Some(UploadedFile { filename, spool }) = file else {
        return Err(AppError::invalid_input("Missing file part"));
    };

    let id = VideoIdentifier::new();
    let storage_key = derive_upload_key(&id, &filename);

    let title = title
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| filename.clone());
    let description = description.unwrap_or_default();

    let metadata = HashMap::from([
        ("title".to_string(), title.clone()),
        ("description".to_string(), description.clone()),
        ("original_filename".to_string(), filename),
    ]);

    let body = ByteStream::from_path(spool.path())
        .await
        .map_err(spool_error)?;
    let url = video_storage
        .put_object(body, &storage_key, metadata)
        .await?;
    drop(spool);

    tracing::info!("Stored video {id} at {storage_key}");

    Ok((
        StatusCode::CREATED,
        Json(VideoResponse {
            id: id.to_string(),
            storage_key: storage_key.into(),
            url,
            title,
            description,
        }),
    ))
}

/// Redirects to a video by ID
///
/// The ID is mapped to `videos/{id}.mp4` (or `videos/{id}` when it already
/// ends in `.mp4`).
///
/// # Errors
///
/// - `404 NOT_FOUND` - no object under the derived key
/// - `500 INTERNAL_SERVER_ERROR` - the existence probe failed, or the resolved
///   URL cannot be sent as a `Location` header
#[instrument(skip(video_storage))]
pub async fn get_video(
    Extension(video_storage): Extension<Arc<VideoStorage>>,
    Path(video_id): Path<String>,
) -> Result<VideoRedirect, AppError> {
    let storage_key = derive_lookup_key(&video_id);
    let url = video_storage.resolve_url(&storage_key).await?;

    // Location must be a valid header value
    if let Err(e) = HeaderValue::from_str(&url) {
        tracing::error!("Resolved URL for {storage_key} is not a valid Location header: {e}");
        return Err(AppError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "invalid_redirect_url",
            "Error retrieving video",
            false,
        ));
    }

    Ok(VideoRedirect(Redirect::temporary(&url)))
}

/// Returns basic information about a video
///
/// Only the URL is real; title and description are placeholders derived
/// from the ID, no stored metadata is read.
///
/// # Errors
///
/// - `404 NOT_FOUND` - no object under the derived key
/// - `500 INTERNAL_SERVER_ERROR` - the existence probe failed
#[instrument(skip(video_storage))]
pub async fn get_video_info(
    Extension(video_storage): Extension<Arc<VideoStorage>>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoMetadata>, AppError> {
    let storage_key = derive_lookup_key(&video_id);
    let url = video_storage.resolve_url(&storage_key).await?;

    Ok(Json(VideoMetadata {
        title: format!("Video {video_id}"),
        description: PLACEHOLDER_DESCRIPTION.to_string(),
        id: video_id,
        url,
    }))
}
