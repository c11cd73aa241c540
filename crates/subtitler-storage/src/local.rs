use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{
    error::StorageError,
    key::validate_key,
    object::{ObjectStore, ObjectUri},
};

/// Object store backed by a local directory, for development and tests
///
/// Objects land at `{root}/{bucket}/{key}` and are addressed as
/// `local://{bucket}/{key}`.
pub struct LocalObjectStore {
    root: PathBuf,
    bucket: String,
}

impl LocalObjectStore {
    pub fn new(root: PathBuf, bucket: String) -> Self {
        Self { root, bucket }
    }

    /// Filesystem path an object key maps to
    pub fn object_path(&self, key: &str) -> crate::Result<PathBuf> {
        Ok(self.root.join(&self.bucket).join(validate_key(key)?))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn persist(&self, local_path: &Path, key: &str) -> crate::Result<ObjectUri> {
        let destination = self.object_path(key)?;

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }

        tokio::fs::copy(local_path, &destination)
            .await
            .map_err(|e| StorageError::io(local_path, e))?;

        tracing::debug!(path = %destination.display(), "object stored on local disk");

        Ok(ObjectUri::new("local", &self.bucket, key))
    }

    fn name(&self) -> &str {
        "local"
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
