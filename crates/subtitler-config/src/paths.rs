use std::path::PathBuf;

use serde::Deserialize;

/// Local directories used as the hand-off between pipeline stages
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Received videos and extracted audio
    #[serde(default = "default_uploads")]
    pub uploads: PathBuf,
    /// Generated SRT artifacts
    #[serde(default = "default_subtitles")]
    pub subtitles: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            uploads: default_uploads(),
            subtitles: default_subtitles(),
        }
    }
}

fn default_uploads() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_subtitles() -> PathBuf {
    PathBuf::from("subtitles")
}
