use std::net::SocketAddr;

use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    /// Externally reachable base URL, used to build download links
    #[serde(default = "default_public_url")]
    pub public_url: Url,
    /// Maximum accepted request body for uploads
    #[serde(default = "default_upload_limit")]
    pub upload_limit_bytes: usize,
    #[serde(default)]
    pub health: HealthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            public_url: default_public_url(),
            upload_limit_bytes: default_upload_limit(),
            health: HealthConfig::default(),
        }
    }
}

/// Liveness endpoint configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_health_path")]
    pub path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_health_path(),
        }
    }
}

fn default_public_url() -> Url {
    Url::parse("http://localhost:8080").expect("must be valid URL")
}

const fn default_upload_limit() -> usize {
    1 << 30
}

const fn default_enabled() -> bool {
    true
}

fn default_health_path() -> String {
    "/".to_string()
}
