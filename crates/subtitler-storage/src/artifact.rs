use std::path::PathBuf;

use async_trait::async_trait;

use crate::{error::StorageError, key::validate_key};

/// Named byte artifacts produced by the pipeline
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous artifact
    async fn write(&self, key: &str, bytes: &[u8]) -> crate::Result<()>;

    /// Fetch the artifact stored under `key`
    async fn read(&self, key: &str) -> crate::Result<Vec<u8>>;

    async fn exists(&self, key: &str) -> crate::Result<bool>;
}

/// Artifact store rooted at a local directory
///
/// The directory is created on first write.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    dir: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> crate::Result<PathBuf> {
        Ok(self.dir.join(validate_key(key)?))
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn write(&self, key: &str, bytes: &[u8]) -> crate::Result<()> {
        let path = self.path_for(key)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::io(&self.dir, e))?;

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::io(&path, e))
    }

    async fn read(&self, key: &str) -> crate::Result<Vec<u8>> {
        let path = self.path_for(key)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound(key.to_owned())),
            Err(e) => Err(StorageError::io(&path, e)),
        }
    }

    async fn exists(&self, key: &str) -> crate::Result<bool> {
        let path = self.path_for(key)?;

        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::io(&path, e))
    }
}
