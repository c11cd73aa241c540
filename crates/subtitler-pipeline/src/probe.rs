use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ffprobe exited with code {code:?}: {stderr}")]
    Exited { code: Option<i32>, stderr: String },

    #[error("unusable duration {0:?}")]
    Unparseable(String),
}

/// Measures how long an audio artifact plays
#[async_trait]
pub trait DurationProbe: Send + Sync {
    async fn probe(&self, audio: &Path) -> Result<Duration, ProbeError>;
}

/// Reports the same duration for every file
#[derive(Debug, Clone, Copy)]
pub struct FixedDuration(Duration);

impl FixedDuration {
    pub fn new(duration: Duration) -> Self {
        Self(duration)
    }

    /// # Errors
    ///
    /// Returns an error for negative, NaN or infinite values
    pub fn from_secs_f64(seconds: f64) -> anyhow::Result<Self> {
        Duration::try_from_secs_f64(seconds)
            .map(Self)
            .map_err(|e| anyhow::anyhow!("invalid duration {seconds}: {e}"))
    }
}

#[async_trait]
impl DurationProbe for FixedDuration {
    async fn probe(&self, _audio: &Path) -> Result<Duration, ProbeError> {
        Ok(self.0)
    }
}

/// Reads the container duration with `ffprobe`
#[derive(Debug, Clone)]
pub struct FfprobeDuration {
    program: PathBuf,
}

impl FfprobeDuration {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }
}

#[async_trait]
impl DurationProbe for FfprobeDuration {
    async fn probe(&self, audio: &Path) -> Result<Duration, ProbeError> {
        let output = tokio::process::Command::new(&self.program)
            .args(["-v", "error", "-show_entries", "format=duration", "-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(audio)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProbeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Exited {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        parse_ffprobe_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse the bare seconds value ffprobe prints, e.g. `486.120000`
pub fn parse_ffprobe_duration(raw: &str) -> Result<Duration, ProbeError> {
    let trimmed = raw.trim();

    trimmed
        .parse::<f64>()
        .ok()
        .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
        .ok_or_else(|| ProbeError::Unparseable(trimmed.to_owned()))
}
