use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use speech::Transcriber;
use srt::{SRT_EXTENSION, Transcript};
use subtitler_storage::{ArtifactStore, ObjectStore, ObjectUri, validate_key};

use crate::{
    error::PipelineError,
    extract::{AudioExtractor, ExtractionError},
    probe::DurationProbe,
    stage::{ConversionRequest, FailedStage},
};

/// External collaborators, constructed once at startup
pub struct PipelineComponents {
    pub extractor: Arc<dyn AudioExtractor>,
    pub probe: Arc<dyn DurationProbe>,
    pub objects: Arc<dyn ObjectStore>,
    pub transcriber: Arc<dyn Transcriber>,
    pub artifacts: Arc<dyn ArtifactStore>,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Where extracted audio is written before upload
    pub uploads_dir: PathBuf,
    pub audio_extension: String,
    pub extraction_timeout: Duration,
    pub transcription_timeout: Duration,
    /// Caption span used when the duration probe fails
    pub fallback_duration: Duration,
}

/// A received video waiting to be converted
#[derive(Debug, Clone)]
pub struct UploadedVideo {
    /// Where the upload was spooled on local disk
    pub path: PathBuf,
    /// Client-supplied file name; the identity of every derived artifact
    pub original_name: String,
}

/// Result of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub asset_name: String,
    /// Artifact store key of the SRT document
    pub artifact_key: String,
    pub audio_uri: ObjectUri,
    pub cue_count: usize,
    pub duration: Duration,
}

struct ExtractedAudio {
    path: PathBuf,
    duration: Duration,
}

struct StoredAudio {
    uri: ObjectUri,
    duration: Duration,
}

struct TranscribedAudio {
    uri: ObjectUri,
    transcript: Transcript,
    duration: Duration,
}

/// Sequences extraction, storage, transcription and captioning for uploads
///
/// Stages run strictly one after another for a given upload. The first
/// failure ends the conversion; nothing is retried and artifacts already
/// written are left in place.
pub struct Pipeline {
    components: PipelineComponents,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(components: PipelineComponents, settings: PipelineSettings) -> Self {
        Self { components, settings }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Store holding generated captions
    pub fn artifacts(&self) -> &Arc<dyn ArtifactStore> {
        &self.components.artifacts
    }

    /// Key of the SRT artifact generated for `asset_name`
    pub fn artifact_key(asset_name: &str) -> String {
        format!("{asset_name}.{SRT_EXTENSION}")
    }

    fn audio_key(&self, asset_name: &str) -> String {
        format!("{asset_name}.{}", self.settings.audio_extension)
    }

    /// Convert one uploaded video into an SRT artifact
    #[tracing::instrument(name = "conversion", skip_all, fields(asset = %upload.original_name))]
    pub async fn process(&self, upload: &UploadedVideo) -> Result<ConversionOutcome, PipelineError> {
        let mut request = ConversionRequest::new(upload.original_name.clone());

        let result = self.run(&mut request, upload).await;

        if let Err(e) = &result {
            let stage = request.fail();
            tracing::error!(%stage, "conversion failed: {e}");
        }

        result
    }

    async fn run(&self, request: &mut ConversionRequest, upload: &UploadedVideo) -> Result<ConversionOutcome, PipelineError> {
        let extracted = self.extract_audio(request.asset_name(), &upload.path).await?;
        request.advance();

        let stored = self.store_audio(request.asset_name(), extracted).await?;
        request.advance();

        let transcribed = self.transcribe(stored).await?;
        request.advance();

        let outcome = self.write_captions(request.asset_name(), transcribed).await?;
        request.advance();

        Ok(outcome)
    }

    async fn extract_audio(&self, asset_name: &str, video: &Path) -> Result<ExtractedAudio, PipelineError> {
        validate_key(asset_name)
            .map_err(|_| PipelineError::ExtractionFailed(ExtractionError::InvalidAssetName(asset_name.to_owned())))?;

        let uploads_dir = &self.settings.uploads_dir;
        tokio::fs::create_dir_all(uploads_dir).await.map_err(|source| {
            PipelineError::ExtractionFailed(ExtractionError::Io {
                path: uploads_dir.clone(),
                source,
            })
        })?;

        let audio_path = uploads_dir.join(self.audio_key(asset_name));
        let limit = self.settings.extraction_timeout;

        tracing::info!("starting audio extraction");

        tokio::time::timeout(limit, self.components.extractor.extract(video, &audio_path))
            .await
            .map_err(|_| PipelineError::Timeout {
                stage: FailedStage::Extraction,
                limit,
            })?
            .map_err(PipelineError::ExtractionFailed)?;

        let duration = self.probe_duration(&audio_path).await;

        Ok(ExtractedAudio {
            path: audio_path,
            duration,
        })
    }

    /// Measure the extracted audio, falling back when the probe fails or hangs
    async fn probe_duration(&self, audio_path: &Path) -> Duration {
        let limit = self.settings.extraction_timeout;
        let fallback = self.settings.fallback_duration;

        match tokio::time::timeout(limit, self.components.probe.probe(audio_path)).await {
            Ok(Ok(duration)) => duration,
            Ok(Err(e)) => {
                tracing::warn!(fallback_secs = fallback.as_secs_f64(), "duration probe failed, using fallback: {e}");
                fallback
            }
            Err(_) => {
                tracing::warn!(
                    fallback_secs = fallback.as_secs_f64(),
                    "duration probe timed out after {}s, using fallback",
                    limit.as_secs()
                );
                fallback
            }
        }
    }

    async fn store_audio(&self, asset_name: &str, audio: ExtractedAudio) -> Result<StoredAudio, PipelineError> {
        let key = self.audio_key(asset_name);

        tracing::info!(
            backend = self.components.objects.name(),
            bucket = self.components.objects.bucket(),
            key = %key,
            "uploading audio"
        );

        let uri = self
            .components
            .objects
            .persist(&audio.path, &key)
            .await
            .map_err(PipelineError::StorageUploadFailed)?;

        Ok(StoredAudio {
            uri,
            duration: audio.duration,
        })
    }

    async fn transcribe(&self, audio: StoredAudio) -> Result<TranscribedAudio, PipelineError> {
        let limit = self.settings.transcription_timeout;

        tracing::info!(
            provider = self.components.transcriber.name(),
            uri = %audio.uri,
            "starting transcription"
        );

        let transcript = tokio::time::timeout(limit, self.components.transcriber.transcribe(&audio.uri))
            .await
            .map_err(|_| PipelineError::Timeout {
                stage: FailedStage::Transcription,
                limit,
            })?
            .map_err(PipelineError::TranscriptionFailed)?;

        tracing::debug!(lines = transcript.len(), "transcription received");

        Ok(TranscribedAudio {
            uri: audio.uri,
            transcript,
            duration: audio.duration,
        })
    }

    async fn write_captions(&self, asset_name: &str, audio: TranscribedAudio) -> Result<ConversionOutcome, PipelineError> {
        let document = audio.transcript.to_srt(audio.duration);
        let artifact_key = Self::artifact_key(asset_name);

        if document.is_empty() {
            tracing::warn!("no speech recognized, writing an empty caption file");
        }

        self.components
            .artifacts
            .write(&artifact_key, document.to_string().as_bytes())
            .await
            .map_err(PipelineError::CaptionWriteFailed)?;

        tracing::info!(key = %artifact_key, cues = document.cues().len(), "SRT file generated");

        Ok(ConversionOutcome {
            asset_name: asset_name.to_owned(),
            artifact_key,
            audio_uri: audio.uri,
            cue_count: document.cues().len(),
            duration: audio.duration,
        })
    }
}
