mod google;

use async_trait::async_trait;
use srt::Transcript;
use subtitler_storage::ObjectUri;

pub use google::{GoogleSpeechProvider, RecognitionSettings};

/// Speech recognition over audio already in durable storage
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Recognize the audio at `audio` and wait until the result is ready
    async fn transcribe(&self, audio: &ObjectUri) -> crate::error::Result<Transcript>;

    /// Get the provider name
    fn name(&self) -> &str;
}
