//! Code model configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// Deterministic template synthesis.
    #[default]
    Template,
    /// HTTP text-generation endpoint.
    Remote,
}

fn default_model_id() -> String {
    String::from("code-bison")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub backend: ModelBackend,

    #[serde(default)]
    pub endpoint: String,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(default)]
    pub api_key: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::default(),
            endpoint: String::new(),
            model_id: default_model_id(),
            api_key: String::new(),
        }
    }
}

impl ModelConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self.backend {
            ModelBackend::Template => true,
            ModelBackend::Remote => !self.endpoint.is_empty() && !self.model_id.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_template() {
        let config = ModelConfig::default();
        assert_eq!(config.backend, ModelBackend::Template);
        assert_eq!(config.model_id, "code-bison");
        assert!(config.is_configured());
    }

    #[test]
    fn remote_needs_endpoint() {
        let config = ModelConfig {
            backend: ModelBackend::Remote,
            ..Default::default()
        };
        assert!(!config.is_configured());
    }
}
