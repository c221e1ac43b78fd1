//! Code store configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local filesystem paths.
    #[default]
    Local,
    /// HTTP object store, `{endpoint}/{bucket}/{key}`.
    Object,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Base directory relative paths resolve against. Empty means the
    /// current directory.
    #[serde(default)]
    pub root: String,

    #[serde(default)]
    pub bucket: String,

    #[serde(default)]
    pub endpoint: String,
}

impl StorageConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self.backend {
            StorageBackend::Local => true,
            StorageBackend::Object => !self.endpoint.is_empty() && !self.bucket.is_empty(),
        }
    }
}
