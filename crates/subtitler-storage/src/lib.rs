//! Storage capabilities for the subtitle pipeline
//!
//! Two seams live here. [`ObjectStore`] persists extracted audio somewhere
//! the speech service can read it and hands back its URI. [`ArtifactStore`]
//! keeps named pipeline outputs such as SRT documents.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod artifact;
mod error;
mod gcs;
mod http_client;
mod key;
mod local;
mod object;

use std::sync::Arc;

use subtitler_config::StorageConfig;

pub use artifact::{ArtifactStore, LocalArtifactStore};
pub use error::{Result, StorageError};
pub use gcs::GcsObjectStore;
pub use key::validate_key;
pub use local::LocalObjectStore;
pub use object::{ObjectStore, ObjectUri};

/// Build the configured object store
///
/// # Errors
///
/// Returns an error if required credentials are missing
pub fn build_object_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config {
        StorageConfig::Gcs(gcs) => {
            let token = gcs
                .access_token
                .clone()
                .ok_or_else(|| anyhow::anyhow!("GCS storage requires an access token"))?;

            Arc::new(GcsObjectStore::new(gcs.bucket.clone(), token, gcs.base_url.clone()))
        }
        StorageConfig::Local(local) => Arc::new(LocalObjectStore::new(local.root.clone(), local.bucket.clone())),
    };

    tracing::debug!(backend = store.name(), bucket = store.bucket(), "object store initialized");

    Ok(store)
}
