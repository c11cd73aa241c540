use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Key is empty or would escape its directory
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// Nothing stored under this key
    #[error("Artifact '{0}' not found")]
    NotFound(String),

    /// Local filesystem failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Credentials rejected by the storage service
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Storage service returned an error
    #[error("Storage API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// Network or connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Misconfigured endpoint
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
