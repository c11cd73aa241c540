use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use srt::Transcript;
use subtitler_config::GoogleSpeechConfig;
use subtitler_storage::ObjectUri;
use url::Url;

use crate::{
    error::TranscriptionError,
    http_client::http_client,
    types::{LongRunningRecognizeResponse, normalize},
};

use super::Transcriber;

const DEFAULT_SPEECH_API_URL: &str = "https://speech.googleapis.com";

/// Audio parameters sent with every recognition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionSettings {
    pub encoding: String,
    pub sample_rate_hertz: u32,
    pub language_code: String,
}

/// Google Cloud Speech-to-Text v1, long-running recognition
pub struct GoogleSpeechProvider {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    access_token: Option<SecretString>,
    settings: RecognitionSettings,
    poll_interval: Duration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LongRunningRecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'a str,
    sample_rate_hertz: u32,
    language_code: &'a str,
}

#[derive(Serialize)]
struct RecognitionAudio<'a> {
    uri: &'a str,
}

/// `google.longrunning.Operation`
#[derive(Debug, Deserialize)]
struct Operation {
    #[serde(default)]
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<OperationStatus>,
    #[serde(default)]
    response: Option<LongRunningRecognizeResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

impl GoogleSpeechProvider {
    pub fn new(
        base_url: Option<Url>,
        api_key: Option<SecretString>,
        access_token: Option<SecretString>,
        settings: RecognitionSettings,
        poll_interval: Duration,
    ) -> crate::Result<Self> {
        if api_key.is_none() && access_token.is_none() {
            return Err(TranscriptionError::ConfigError(
                "Google speech requires an API key or an access token".to_string(),
            ));
        }

        let base_url = base_url.unwrap_or_else(|| Url::parse(DEFAULT_SPEECH_API_URL).expect("must be valid URL"));

        Ok(Self {
            client: http_client(),
            base_url,
            api_key,
            access_token,
            settings,
            poll_interval,
        })
    }

    pub fn from_config(config: &GoogleSpeechConfig) -> crate::Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.access_token.clone(),
            RecognitionSettings {
                encoding: config.encoding.clone(),
                sample_rate_hertz: config.sample_rate_hertz,
                language_code: config.language_code.clone(),
            },
            config.poll_interval,
        )
    }

    fn endpoint(&self, segments: &[&str]) -> crate::Result<Url> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| TranscriptionError::ConfigError(format!("Speech base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn authorize(&self, mut builder: RequestBuilder) -> RequestBuilder {
        if let Some(key) = &self.api_key {
            builder = builder.query(&[("key", key.expose_secret())]);
        }
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        builder
    }

    async fn start(&self, audio: &ObjectUri) -> crate::Result<Operation> {
        let url = self.endpoint(&["v1", "speech:longrunningrecognize"])?;

        let body = LongRunningRecognizeRequest {
            config: RecognitionConfig {
                encoding: &self.settings.encoding,
                sample_rate_hertz: self.settings.sample_rate_hertz,
                language_code: &self.settings.language_code,
            },
            audio: RecognitionAudio { uri: audio.as_str() },
        };

        tracing::debug!(
            "Google speech recognition request: uri={audio}, encoding={}, sample_rate={}, language={}",
            self.settings.encoding,
            self.settings.sample_rate_hertz,
            self.settings.language_code,
        );

        self.send(self.authorize(self.client.post(url).json(&body))).await
    }

    async fn poll(&self, name: &str) -> crate::Result<Operation> {
        let url = self.endpoint(&["v1", "operations", name])?;

        self.send(self.authorize(self.client.get(url))).await
    }

    async fn send(&self, request: RequestBuilder) -> crate::Result<Operation> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Google speech request failed: {e}");
            TranscriptionError::ConnectionError(format!("Failed to send request to Google speech: {e}"))
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("Google speech API error ({status}): {error_text}");

            return Err(match status.as_u16() {
                401 | 403 => TranscriptionError::AuthenticationFailed(error_text),
                400 => TranscriptionError::InvalidRequest(error_text),
                _ => TranscriptionError::ProviderApiError {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Google speech response: {e}");
            TranscriptionError::InvalidResponse(e.to_string())
        })
    }
}

/// Turn a finished operation into a transcript or its failure
fn finish(operation: Operation) -> crate::Result<Transcript> {
    if let Some(status) = operation.error {
        return Err(TranscriptionError::OperationFailed {
            code: status.code,
            message: status.message,
        });
    }

    operation
        .response
        .map(normalize)
        .ok_or(TranscriptionError::MissingResponse(operation.name))
}

#[async_trait]
impl Transcriber for GoogleSpeechProvider {
    async fn transcribe(&self, audio: &ObjectUri) -> crate::error::Result<Transcript> {
        let mut operation = self.start(audio).await?;

        while !operation.done {
            if operation.name.is_empty() {
                return Err(TranscriptionError::InvalidResponse(
                    "pending operation has no name".to_string(),
                ));
            }

            tracing::debug!(operation = %operation.name, "waiting for recognition operation");
            tokio::time::sleep(self.poll_interval).await;

            operation = self.poll(&operation.name).await?;
        }

        let transcript = finish(operation)?;

        tracing::debug!(lines = transcript.len(), "Google speech recognition complete");

        Ok(transcript)
    }

    fn name(&self) -> &str {
        "google"
    }
}
