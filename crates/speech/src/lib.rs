#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod http_client;
mod provider;
mod types;

use std::sync::Arc;

use subtitler_config::TranscriptionConfig;

pub use error::{Result, TranscriptionError};
pub use provider::{GoogleSpeechProvider, RecognitionSettings, Transcriber};
pub use types::{LongRunningRecognizeResponse, SpeechRecognitionAlternative, SpeechRecognitionResult, normalize};

/// Build the configured transcriber
///
/// # Errors
///
/// Returns an error if the provider has no usable credentials
pub fn build_transcriber(config: &TranscriptionConfig) -> anyhow::Result<Arc<dyn Transcriber>> {
    let transcriber: Arc<dyn Transcriber> = match config {
        TranscriptionConfig::Google(google) => Arc::new(
            GoogleSpeechProvider::from_config(google)
                .map_err(|e| anyhow::anyhow!("Failed to initialize speech provider: {e}"))?,
        ),
    };

    tracing::debug!(provider = transcriber.name(), "transcriber initialized");

    Ok(transcriber)
}
