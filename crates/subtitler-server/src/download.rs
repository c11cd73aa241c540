use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use http::{HeaderValue, header};
use subtitler_pipeline::Pipeline;

use crate::{
    AppState,
    error::{Result, ServerError},
};

/// Serve a previously generated SRT artifact
///
/// Missing, unreadable and malformed names all produce the same failure.
pub(crate) async fn download_handler(
    State(state): State<Arc<AppState>>,
    Path(asset_name): Path<String>,
) -> Result<Response> {
    let key = Pipeline::artifact_key(&asset_name);

    let bytes = state.pipeline.artifacts().read(&key).await.map_err(|e| {
        tracing::warn!(key = %key, "caption download failed: {e}");
        ServerError::DownloadFailed
    })?;

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(srt::SRT_CONTENT_TYPE)),
        (header::CONTENT_DISPOSITION, content_disposition(&key)),
    ];

    Ok((headers, bytes).into_response())
}

/// `attachment` disposition naming the artifact, restricted to header-safe characters
pub(crate) fn content_disposition(file_name: &str) -> HeaderValue {
    let safe: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();

    HeaderValue::from_str(&format!("attachment; filename=\"{safe}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
