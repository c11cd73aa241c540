use thiserror::Error;

pub type Result<T> = std::result::Result<T, TranscriptionError>;

/// Speech recognition failures
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// Credentials rejected by the provider
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Provider refused the request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Provider API returned an error
    #[error("Provider API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// Network or connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The long-running operation finished with an error
    #[error("Recognition operation failed ({code}): {message}")]
    OperationFailed { code: i32, message: String },

    /// The long-running operation finished without a result
    #[error("Recognition operation '{0}' completed without a response")]
    MissingResponse(String),

    /// Provider response could not be decoded
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
