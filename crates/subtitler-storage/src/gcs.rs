use std::path::Path;

use async_trait::async_trait;
use reqwest::{Body, Client};
use secrecy::{ExposeSecret, SecretString};
use tokio_util::io::ReaderStream;
use url::Url;

use crate::{
    error::StorageError,
    http_client::http_client,
    key::validate_key,
    object::{ObjectStore, ObjectUri},
};

const DEFAULT_GCS_API_URL: &str = "https://storage.googleapis.com";

/// Google Cloud Storage uploader using the JSON API media upload
pub struct GcsObjectStore {
    client: Client,
    base_url: Url,
    bucket: String,
    access_token: SecretString,
}

impl GcsObjectStore {
    pub fn new(bucket: String, access_token: SecretString, base_url: Option<Url>) -> Self {
        let base_url = base_url.unwrap_or_else(|| Url::parse(DEFAULT_GCS_API_URL).expect("must be valid URL"));

        Self {
            client: http_client(),
            base_url,
            bucket,
            access_token,
        }
    }

    fn upload_url(&self, key: &str) -> crate::Result<Url> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| StorageError::ConfigError(format!("GCS base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["upload", "storage", "v1", "b", self.bucket.as_str(), "o"]);

        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", key);

        Ok(url)
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn persist(&self, local_path: &Path, key: &str) -> crate::Result<ObjectUri> {
        let key = validate_key(key)?;
        let url = self.upload_url(key)?;

        let file = tokio::fs::File::open(local_path)
            .await
            .map_err(|e| StorageError::io(local_path, e))?;
        let length = file
            .metadata()
            .await
            .map_err(|e| StorageError::io(local_path, e))?
            .len();

        tracing::debug!(bucket = %self.bucket, key, bytes = length, "uploading object to GCS");

        let response = self
            .client
            .post(url)
            .bearer_auth(self.access_token.expose_secret())
            .header(http::header::CONTENT_TYPE, "application/octet-stream")
            .header(http::header::CONTENT_LENGTH, length)
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("GCS upload request failed: {e}");
                StorageError::ConnectionError(format!("Failed to send request to GCS: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("GCS API error ({status}): {error_text}");

            return Err(match status.as_u16() {
                401 | 403 => StorageError::AuthenticationFailed(error_text),
                _ => StorageError::ProviderApiError {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        Ok(ObjectUri::new("gs", &self.bucket, key))
    }

    fn name(&self) -> &str {
        "gcs"
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
