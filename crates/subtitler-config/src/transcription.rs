use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Speech recognition backend
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptionConfig {
    /// Google Cloud Speech-to-Text, long-running recognition
    Google(GoogleSpeechConfig),
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self::Google(GoogleSpeechConfig::default())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoogleSpeechConfig {
    /// API key sent as the `key` query parameter
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// OAuth2 bearer token
    #[serde(default)]
    pub access_token: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default = "default_sample_rate")]
    pub sample_rate_hertz: u32,
    #[serde(default = "default_language")]
    pub language_code: String,
    /// Delay between operation status checks
    #[serde(default = "default_poll_interval", deserialize_with = "crate::de::duration")]
    pub poll_interval: Duration,
    /// Upper bound on the whole recognition wait
    #[serde(default = "default_timeout", deserialize_with = "crate::de::duration")]
    pub timeout: Duration,
}

impl Default for GoogleSpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            access_token: None,
            base_url: None,
            encoding: default_encoding(),
            sample_rate_hertz: default_sample_rate(),
            language_code: default_language(),
            poll_interval: default_poll_interval(),
            timeout: default_timeout(),
        }
    }
}

fn default_encoding() -> String {
    "LINEAR16".to_string()
}

const fn default_sample_rate() -> u32 {
    44_100
}

fn default_language() -> String {
    "en-US".to_string()
}

const fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30 * 60)
}
