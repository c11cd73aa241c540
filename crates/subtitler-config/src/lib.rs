#![allow(clippy::must_use_candidate)]

mod de;
pub mod duration;
mod env;
pub mod extraction;
mod loader;
pub mod log;
pub mod paths;
pub mod server;
pub mod storage;
pub mod transcription;

use serde::Deserialize;

pub use duration::*;
pub use extraction::*;
pub use log::*;
pub use paths::*;
pub use server::*;
pub use storage::*;
pub use transcription::*;

/// Top-level subtitler configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Local working directories
    #[serde(default)]
    pub paths: PathsConfig,
    /// Durable object storage for extracted audio
    #[serde(default)]
    pub storage: StorageConfig,
    /// Speech recognition backend
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    /// Audio extraction subprocess
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Where the caption span comes from
    #[serde(default)]
    pub duration: DurationConfig,
    /// Log output
    #[serde(default)]
    pub log: LogConfig,
}
