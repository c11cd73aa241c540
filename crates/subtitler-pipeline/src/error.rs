use std::time::Duration;

use speech::TranscriptionError;
use subtitler_storage::StorageError;
use thiserror::Error;

use crate::{extract::ExtractionError, stage::FailedStage};

/// Terminal failure of one conversion
///
/// Every variant names the stage it came from; none are retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Audio extraction failed: {0}")]
    ExtractionFailed(#[source] ExtractionError),

    #[error("Failed to upload audio to storage: {0}")]
    StorageUploadFailed(#[source] StorageError),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(#[source] TranscriptionError),

    #[error("Failed to write captions: {0}")]
    CaptionWriteFailed(#[source] StorageError),

    #[error("{stage} timed out after {}s", limit.as_secs())]
    Timeout { stage: FailedStage, limit: Duration },
}

impl PipelineError {
    pub fn stage(&self) -> FailedStage {
        match self {
            Self::ExtractionFailed(_) => FailedStage::Extraction,
            Self::StorageUploadFailed(_) => FailedStage::Storage,
            Self::TranscriptionFailed(_) => FailedStage::Transcription,
            Self::CaptionWriteFailed(_) => FailedStage::Captioning,
            Self::Timeout { stage, .. } => *stage,
        }
    }

    /// Exit code of a failed extraction process, when it exited normally
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExtractionFailed(ExtractionError::Exited { code }) => *code,
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
