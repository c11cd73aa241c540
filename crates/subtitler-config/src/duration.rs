use std::path::PathBuf;

use serde::Deserialize;

/// Audio length used to spread captions, in seconds
pub const DEFAULT_DURATION_SECONDS: f64 = 486.0;

/// Source of the total caption duration
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DurationConfig {
    /// The same span for every upload
    Fixed(FixedDurationConfig),
    /// Measure the extracted audio with `ffprobe`
    Ffprobe(FfprobeConfig),
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self::Fixed(FixedDurationConfig::default())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedDurationConfig {
    #[serde(default = "default_seconds")]
    pub seconds: f64,
}

impl Default for FixedDurationConfig {
    fn default() -> Self {
        Self {
            seconds: default_seconds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FfprobeConfig {
    #[serde(default = "default_ffprobe")]
    pub ffprobe_path: PathBuf,
    /// Used when probing fails
    #[serde(default = "default_seconds")]
    pub fallback_seconds: f64,
}

const fn default_seconds() -> f64 {
    DEFAULT_DURATION_SECONDS
}

fn default_ffprobe() -> PathBuf {
    PathBuf::from("ffprobe")
}
