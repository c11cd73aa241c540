use std::fmt;
use std::path::Path;

use async_trait::async_trait;

/// Location of a persisted object, in `scheme://bucket/key` form
///
/// Kept as plain text rather than a parsed URL so object names reach the
/// speech service exactly as they were stored, without percent-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUri(String);

impl ObjectUri {
    pub fn new(scheme: &str, bucket: &str, key: &str) -> Self {
        Self(format!("{scheme}://{bucket}/{key}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Durable storage for pipeline inputs handed to external services
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload the file at `local_path` under `key` and return its URI
    async fn persist(&self, local_path: &Path, key: &str) -> crate::Result<ObjectUri>;

    /// Backend name, for logs
    fn name(&self) -> &str;

    fn bucket(&self) -> &str;
}
