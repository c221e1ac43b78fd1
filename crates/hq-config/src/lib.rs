//! # hq-config
//!
//! Layered configuration loading for healthqa using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HQA_*` prefix, `__` as separator)
//! 2. Explicit overrides passed to [`HqConfig::load_with_env_overrides`]
//! 3. Project-level `.healthqa/config.toml`
//! 4. User-level `~/.config/healthqa/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `HQA_TRACKER__PROVIDER` -> `tracker.provider`,
//! `HQA_TRACKER__JIRA__API_TOKEN` -> `tracker.jira.api_token`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use hq_config::HqConfig;
//!
//! let config = HqConfig::load_with_dotenv().expect("config");
//!
//! if config.tracker.is_configured() {
//!     println!("tracker: {}", config.tracker.provider.as_str());
//! }
//! ```

mod error;
mod general;
mod metrics;
mod model;
mod storage;
mod tracker;
mod validator;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use metrics::{MetricsBackend, MetricsConfig};
pub use model::{ModelBackend, ModelConfig};
pub use storage::{StorageBackend, StorageConfig};
pub use tracker::{AzureConfig, JiraConfig, TrackerConfig, TrackerProvider};
pub use validator::{ValidatorConfig, ValidatorMode};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "HQA_";

/// Default project-local configuration directory.
pub const PROJECT_CONFIG_DIR: &str = ".healthqa";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HqConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub validator: ValidatorConfig,
}

impl HqConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new(PROJECT_CONFIG_DIR), &[])
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load configuration with extra `HQA_*`-style key/value pairs layered
    /// below the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_env_overrides(overrides: &[(String, String)]) -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new(PROJECT_CONFIG_DIR), overrides)
    }

    /// Load using `config_dir/config.toml` as the project layer.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_from_dir(
        config_dir: &Path,
        overrides: &[(String, String)],
    ) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_from_dir(config_dir, overrides).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain with the default project directory.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_from_dir(Path::new(PROJECT_CONFIG_DIR), &[])
    }

    #[must_use]
    pub fn figment_from_dir(config_dir: &Path, overrides: &[(String, String)]) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = config_dir.join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit overrides
        for (key, value) in overrides {
            if let Some(path) = override_key_path(key) {
                let parsed = value
                    .parse::<Value>()
                    .unwrap_or_else(|_| Value::from(value.clone()));
                figment = figment.merge(Serialized::default(&path, parsed));
            }
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values that extract cleanly but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let coverage = self.validator.simulated_coverage;
        if !(0.0..=1.0).contains(&coverage) {
            return Err(invalid(
                "validator.simulated_coverage",
                format!("{coverage} is outside [0.0, 1.0]"),
            ));
        }
        if self.general.io_timeout_secs == 0 {
            return Err(invalid("general.io_timeout_secs", "must be positive"));
        }
        if self.general.title_max_chars == 0 {
            return Err(invalid("general.title_max_chars", "must be positive"));
        }
        if self.general.traceability_path.is_empty() {
            return Err(invalid("general.traceability_path", "must not be empty"));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("healthqa").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

/// `HQA_TRACKER__JIRA__EMAIL` -> `tracker.jira.email`. Keys without the
/// prefix are ignored.
fn override_key_path(key: &str) -> Option<String> {
    let prefix_len = ENV_PREFIX.len();
    let rest = key
        .get(..prefix_len)
        .filter(|head| head.eq_ignore_ascii_case(ENV_PREFIX))
        .and_then(|_| key.get(prefix_len..))?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_ascii_lowercase().replace("__", "."))
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = HqConfig::default();
        assert!(!config.tracker.is_configured());
        assert!(config.storage.is_configured());
        assert!(config.model.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = HqConfig::figment_from_dir(Path::new("/nonexistent/healthqa"), &[]);
        let config: HqConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.general.title_max_chars, 80);
        assert_eq!(config.metrics.dataset, "healthqa_metrics");
    }

    #[test]
    fn override_keys_map_to_paths() {
        assert_eq!(
            override_key_path("HQA_TRACKER__JIRA__API_TOKEN").as_deref(),
            Some("tracker.jira.api_token")
        );
        assert_eq!(
            override_key_path("hqa_general__output_dir").as_deref(),
            Some("general.output_dir")
        );
        assert_eq!(override_key_path("OTHER_GENERAL__OUTPUT_DIR"), None);
        assert_eq!(override_key_path("HQA_"), None);
    }

    #[test]
    fn validate_rejects_out_of_range_coverage() {
        let mut config = HqConfig::default();
        config.validator.simulated_coverage = 1.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, .. } if field == "validator.simulated_coverage"
        ));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = HqConfig::default();
        config.general.io_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
