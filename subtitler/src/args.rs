use std::path::PathBuf;

use clap::Parser;

/// Subtitle generator service
#[derive(Debug, Parser)]
#[command(name = "subtitler", about = "Turns uploaded videos into SRT subtitle files")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "subtitler.toml", env = "SUBTITLER_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "SUBTITLER_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
