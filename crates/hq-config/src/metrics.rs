//! Metrics store configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsBackend {
    /// Process-local store, discarded on exit.
    #[default]
    Memory,
    /// Append-only JSON Lines file.
    Jsonl,
    /// HTTP metrics endpoint.
    Remote,
}

fn default_dataset() -> String {
    String::from("healthqa_metrics")
}

fn default_path() -> String {
    String::from(".healthqa/metrics.jsonl")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub backend: MetricsBackend,

    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// JSONL file used by the `jsonl` backend.
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default)]
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            backend: MetricsBackend::default(),
            dataset: default_dataset(),
            path: default_path(),
            endpoint: String::new(),
        }
    }
}

impl MetricsConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self.backend {
            MetricsBackend::Memory => true,
            MetricsBackend::Jsonl => !self.path.is_empty(),
            MetricsBackend::Remote => !self.endpoint.is_empty(),
        }
    }
}
