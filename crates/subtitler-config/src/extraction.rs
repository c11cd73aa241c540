use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Audio extraction subprocess settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfig {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg_path: PathBuf,
    /// Extension of the extracted audio file, which also selects its container
    #[serde(default = "default_audio_extension")]
    pub audio_extension: String,
    #[serde(default = "default_timeout", deserialize_with = "crate::de::duration")]
    pub timeout: Duration,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg(),
            audio_extension: default_audio_extension(),
            timeout: default_timeout(),
        }
    }
}

fn default_ffmpeg() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_audio_extension() -> String {
    "wav".to_string()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(10 * 60)
}
