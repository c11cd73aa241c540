//! Video-to-subtitle conversion pipeline
//!
//! One upload moves through extraction, audio storage, transcription and
//! captioning in strict sequence. Every external collaborator sits behind a
//! trait so the orchestrator can run against real services or test fakes.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc, clippy::module_name_repetitions)]

mod error;
mod extract;
mod orchestrator;
mod probe;
mod stage;

use std::sync::Arc;
use std::time::Duration;

use subtitler_config::{Config, DurationConfig, TranscriptionConfig};
use subtitler_storage::LocalArtifactStore;

pub use error::PipelineError;
pub use extract::{AudioExtractor, ExtractionError, FfmpegExtractor};
pub use orchestrator::{ConversionOutcome, Pipeline, PipelineComponents, PipelineSettings, UploadedVideo};
pub use probe::{DurationProbe, FfprobeDuration, FixedDuration, ProbeError, parse_ffprobe_duration};
pub use stage::{ConversionRequest, ConversionStage, FailedStage};

/// Assemble the pipeline and its collaborators from configuration
///
/// # Errors
///
/// Returns an error if a collaborator cannot be initialized or a configured
/// duration is out of range
pub fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline> {
    let TranscriptionConfig::Google(google) = &config.transcription;

    let (probe, fallback_seconds): (Arc<dyn DurationProbe>, f64) = match &config.duration {
        DurationConfig::Fixed(fixed) => (Arc::new(FixedDuration::from_secs_f64(fixed.seconds)?), fixed.seconds),
        DurationConfig::Ffprobe(ffprobe) => (
            Arc::new(FfprobeDuration::new(ffprobe.ffprobe_path.clone())),
            ffprobe.fallback_seconds,
        ),
    };

    let fallback_duration = Duration::try_from_secs_f64(fallback_seconds)
        .map_err(|e| anyhow::anyhow!("invalid fallback duration {fallback_seconds}: {e}"))?;

    let components = PipelineComponents {
        extractor: Arc::new(
            FfmpegExtractor::new(config.extraction.ffmpeg_path.clone()).with_sample_rate(google.sample_rate_hertz),
        ),
        probe,
        objects: subtitler_storage::build_object_store(&config.storage)?,
        transcriber: speech::build_transcriber(&config.transcription)?,
        artifacts: Arc::new(LocalArtifactStore::new(config.paths.subtitles.clone())),
    };

    let settings = PipelineSettings {
        uploads_dir: config.paths.uploads.clone(),
        audio_extension: config.extraction.audio_extension.clone(),
        extraction_timeout: config.extraction.timeout,
        transcription_timeout: google.timeout,
        fallback_duration,
    };

    Ok(Pipeline::new(components, settings))
}
