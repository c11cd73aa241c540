use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Durable object storage backend for extracted audio
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Google Cloud Storage JSON API
    Gcs(GcsStorageConfig),
    /// A directory on local disk laid out as `{root}/{bucket}/{key}`
    Local(LocalStorageConfig),
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Gcs(GcsStorageConfig::default())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GcsStorageConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// OAuth2 bearer token
    #[serde(default)]
    pub access_token: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
}

impl Default for GcsStorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            access_token: None,
            base_url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalStorageConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_bucket() -> String {
    "vid-dump".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from("object-store")
}
