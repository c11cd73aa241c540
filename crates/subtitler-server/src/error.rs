use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use subtitler_pipeline::PipelineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Request failures surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ServerError {
    /// Upload request carried no video field
    #[error("No file uploaded")]
    NoFileProvided,

    /// The multipart body could not be read
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// Spooling the upload to local disk failed
    #[error("Failed to store upload: {0}")]
    UploadFailed(#[source] std::io::Error),

    /// A conversion stage failed; the message names the stage
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Caption artifact missing or unreadable
    #[error("Error downloading file.")]
    DownloadFailed,
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoFileProvided | Self::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            Self::UploadFailed(_) | Self::Pipeline(_) | Self::DownloadFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &str {
        match self {
            Self::NoFileProvided | Self::InvalidUpload(_) => "invalid_request_error",
            Self::Pipeline(_) => "processing_error",
            Self::UploadFailed(_) | Self::DownloadFailed => "internal_error",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    message: String,
    r#type: String,
    code: u16,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_response = ErrorResponse {
            error: ErrorDetails {
                message: self.to_string(),
                r#type: self.error_type().to_string(),
                code: status.as_u16(),
            },
        };

        (status, Json(error_response)).into_response()
    }
}
