use std::path::Path;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use serde::Serialize;
use subtitler_pipeline::UploadedVideo;
use tokio::io::AsyncWriteExt;
use url::Url;
use uuid::Uuid;

use crate::{
    AppState,
    error::{Result, ServerError},
};

/// Multipart field carrying the video
const VIDEO_FIELD: &str = "video";

/// Name used when the client omits a usable file name
const FALLBACK_FILE_NAME: &str = "upload";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub download_link: String,
}

/// Accept a video, run the conversion and answer with a download link
pub(crate) async fn upload_handler(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|e| ServerError::InvalidUpload(e.body_text()))?;

    let upload = spool_video(&state.pipeline.settings().uploads_dir, &mut multipart)
        .await?
        .ok_or(ServerError::NoFileProvided)?;

    tracing::info!(asset = %upload.original_name, "file uploaded successfully to the server");

    let result = state.pipeline.process(&upload).await;

    if let Err(e) = tokio::fs::remove_file(&upload.path).await {
        tracing::debug!(path = %upload.path.display(), "could not remove spooled upload: {e}");
    }

    let outcome = result?;

    tracing::info!(
        asset = %outcome.asset_name,
        cues = outcome.cue_count,
        duration_secs = outcome.duration.as_secs_f64(),
        "conversion complete"
    );

    Ok(Json(UploadResponse {
        message: format!(
            "File {} uploaded, transcribed, and SRT file generated.",
            outcome.asset_name
        ),
        download_link: download_link(&state.public_url, &outcome.asset_name).to_string(),
    }))
}

/// Stream the video field to a fresh file under `dir`
///
/// Returns `None` when the form has no video field.
async fn spool_video(dir: &Path, multipart: &mut Multipart) -> Result<Option<UploadedVideo>> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidUpload(e.body_text()))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        // A form submitted without choosing a file still sends the field
        let Some(original_name) = field.file_name().filter(|name| !name.is_empty()).map(sanitize_file_name) else {
            continue;
        };

        tokio::fs::create_dir_all(dir).await.map_err(ServerError::UploadFailed)?;

        let path = dir.join(Uuid::new_v4().simple().to_string());
        let mut file = tokio::fs::File::create(&path).await.map_err(ServerError::UploadFailed)?;

        let written = async {
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| ServerError::InvalidUpload(e.body_text()))?
            {
                file.write_all(&chunk).await.map_err(ServerError::UploadFailed)?;
            }
            file.flush().await.map_err(ServerError::UploadFailed)
        }
        .await;

        if let Err(e) = written {
            discard(&path).await;
            return Err(e);
        }

        return Ok(Some(UploadedVideo { path, original_name }));
    }

    Ok(None)
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!(path = %path.display(), "could not remove partial upload: {e}");
    }
}

/// Reduce a client-supplied file name to its final path component
pub(crate) fn sanitize_file_name(raw: &str) -> String {
    let name = raw.rsplit(['/', '\\']).next().map(str::trim).unwrap_or_default();

    match name {
        "" | "." | ".." => FALLBACK_FILE_NAME.to_string(),
        name => name.to_string(),
    }
}

/// Public URL of the caption download for `asset_name`
pub(crate) fn download_link(public_url: &Url, asset_name: &str) -> Url {
    let mut link = public_url.clone();

    if let Ok(mut segments) = link.path_segments_mut() {
        segments.pop_if_empty().push("download-srt").push(asset_name);
    }

    link
}
