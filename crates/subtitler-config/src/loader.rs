use std::path::Path;

use secrecy::ExposeSecret;

use crate::{Config, DurationConfig, StorageConfig, TranscriptionConfig};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or values are out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server()?;
        self.validate_storage()?;
        self.validate_transcription()?;
        self.validate_extraction()?;
        self.validate_duration()?;
        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        let scheme = self.server.public_url.scheme();
        if scheme != "http" && scheme != "https" {
            anyhow::bail!("server.public_url must be an http(s) URL, got scheme '{scheme}'");
        }

        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if self.server.upload_limit_bytes == 0 {
            anyhow::bail!("server.upload_limit_bytes must be greater than 0");
        }

        Ok(())
    }

    fn validate_storage(&self) -> anyhow::Result<()> {
        match &self.storage {
            StorageConfig::Gcs(gcs) => {
                if gcs.bucket.is_empty() {
                    anyhow::bail!("storage.bucket must not be empty");
                }
                let has_token = gcs
                    .access_token
                    .as_ref()
                    .is_some_and(|token| !token.expose_secret().is_empty());
                if !has_token {
                    anyhow::bail!("storage.access_token is required for gcs storage");
                }
            }
            StorageConfig::Local(local) => {
                if local.bucket.is_empty() {
                    anyhow::bail!("storage.bucket must not be empty");
                }
            }
        }

        Ok(())
    }

    fn validate_transcription(&self) -> anyhow::Result<()> {
        let TranscriptionConfig::Google(google) = &self.transcription;

        let has_credentials = [&google.api_key, &google.access_token]
            .into_iter()
            .flatten()
            .any(|secret| !secret.expose_secret().is_empty());

        if !has_credentials {
            anyhow::bail!("transcription requires either api_key or access_token");
        }

        if google.poll_interval.is_zero() {
            anyhow::bail!("transcription.poll_interval must be greater than 0");
        }

        if google.timeout.is_zero() {
            anyhow::bail!("transcription.timeout must be greater than 0");
        }

        if google.sample_rate_hertz == 0 {
            anyhow::bail!("transcription.sample_rate_hertz must be greater than 0");
        }

        Ok(())
    }

    fn validate_extraction(&self) -> anyhow::Result<()> {
        if self.extraction.timeout.is_zero() {
            anyhow::bail!("extraction.timeout must be greater than 0");
        }

        let extension = &self.extraction.audio_extension;
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            anyhow::bail!("extraction.audio_extension must be a non-empty alphanumeric extension");
        }

        Ok(())
    }

    fn validate_duration(&self) -> anyhow::Result<()> {
        let (field, seconds) = match &self.duration {
            DurationConfig::Fixed(fixed) => ("duration.seconds", fixed.seconds),
            DurationConfig::Ffprobe(probe) => ("duration.fallback_seconds", probe.fallback_seconds),
        };

        if !seconds.is_finite() || seconds < 0.0 {
            anyhow::bail!("{field} must be a finite, non-negative number of seconds");
        }

        Ok(())
    }
}
