use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;

/// Audio extraction failures
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The extraction program could not be started
    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited unsuccessfully
    #[error("{}", describe_exit(.code))]
    Exited { code: Option<i32> },

    /// The asset name cannot be used to derive file names
    #[error("invalid asset name {0:?}")]
    InvalidAssetName(String),

    /// Preparing the output location failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[allow(clippy::ref_option)]
fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("FFmpeg process failed with code {code}"),
        None => "FFmpeg process was terminated by a signal".to_string(),
    }
}

/// Produces a single-channel audio file from an uploaded video
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract(&self, input: &Path, output: &Path) -> Result<(), ExtractionError>;
}

/// Runs `ffmpeg` as a child process
///
/// The child is killed if the extraction future is dropped, so an outer
/// timeout does not leave stray processes behind.
#[derive(Debug, Clone)]
pub struct FfmpegExtractor {
    program: PathBuf,
    sample_rate: Option<u32>,
}

impl FfmpegExtractor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            sample_rate: None,
        }
    }

    /// Resample to the rate the speech service is told to expect
    pub fn with_sample_rate(mut self, hertz: u32) -> Self {
        self.sample_rate = Some(hertz);
        self
    }

    fn command(&self, input: &Path, output: &Path) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);

        command.arg("-y").arg("-i").arg(input).args(["-ac", "1", "-q:a", "0", "-map", "a"]);

        if let Some(hertz) = self.sample_rate {
            command.arg("-ar").arg(hertz.to_string());
        }

        command
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        command
    }
}

#[async_trait]
impl AudioExtractor for FfmpegExtractor {
    async fn extract(&self, input: &Path, output: &Path) -> Result<(), ExtractionError> {
        tracing::debug!(input = %input.display(), output = %output.display(), "starting FFmpeg audio extraction");

        let result = self
            .command(input, output)
            .output()
            .await
            .map_err(|source| ExtractionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&result.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!("FFmpeg stdout: {}", stdout.trim_end());
        }

        let stderr = String::from_utf8_lossy(&result.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!("FFmpeg stderr: {}", stderr.trim_end());
        }

        if !result.status.success() {
            tracing::error!("FFmpeg process exited with code {:?}", result.status.code());
            return Err(ExtractionError::Exited {
                code: result.status.code(),
            });
        }

        tracing::debug!("FFmpeg command completed successfully");

        Ok(())
    }
}
