//! Bug-tracker configuration.

use serde::{Deserialize, Serialize};

/// Which tracker the bug ingestor talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerProvider {
    /// No tracker; ingestion yields nothing.
    #[default]
    None,
    Jira,
    Azure,
    /// A local JSON file of bugs.
    Fixture,
}

impl TrackerProvider {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Jira => "jira",
            Self::Azure => "azure",
            Self::Fixture => "fixture",
        }
    }
}

const fn default_limit() -> usize {
    50
}

fn default_azure_base_url() -> String {
    String::from("https://dev.azure.com")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct JiraConfig {
    /// Site root, e.g. `https://example.atlassian.net`.
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub api_token: String,
}

impl JiraConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.email.is_empty() && !self.api_token.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AzureConfig {
    /// Azure DevOps organization name.
    #[serde(default)]
    pub org: String,

    /// Personal access token.
    #[serde(default)]
    pub pat: String,

    #[serde(default = "default_azure_base_url")]
    pub base_url: String,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            org: String::new(),
            pat: String::new(),
            base_url: default_azure_base_url(),
        }
    }
}

impl AzureConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.org.is_empty() && !self.pat.is_empty() && !self.base_url.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub provider: TrackerProvider,

    /// Tracker project. Required for Azure DevOps, optional filter for Jira.
    #[serde(default)]
    pub project: String,

    /// Maximum number of bugs fetched per run.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Bug fixture file used by the `fixture` provider.
    #[serde(default)]
    pub fixture_path: String,

    #[serde(default)]
    pub jira: JiraConfig,

    #[serde(default)]
    pub azure: AzureConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            provider: TrackerProvider::default(),
            project: String::new(),
            limit: default_limit(),
            fixture_path: String::new(),
            jira: JiraConfig::default(),
            azure: AzureConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Whether the selected provider has everything it needs to run.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self.provider {
            TrackerProvider::None => false,
            TrackerProvider::Jira => self.jira.is_configured(),
            TrackerProvider::Azure => self.azure.is_configured() && !self.project.is_empty(),
            TrackerProvider::Fixture => !self.fixture_path.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = TrackerConfig::default();
        assert_eq!(config.provider, TrackerProvider::None);
        assert_eq!(config.limit, 50);
        assert_eq!(config.azure.base_url, "https://dev.azure.com");
        assert!(!config.is_configured());
    }

    #[test]
    fn jira_needs_all_credentials() {
        let mut config = TrackerConfig {
            provider: TrackerProvider::Jira,
            jira: JiraConfig {
                base_url: "https://example.atlassian.net".into(),
                email: "qa@example.com".into(),
                api_token: String::new(),
            },
            ..Default::default()
        };
        assert!(!config.is_configured());
        config.jira.api_token = "token".into();
        assert!(config.is_configured());
    }

    #[test]
    fn azure_needs_project() {
        let mut config = TrackerConfig {
            provider: TrackerProvider::Azure,
            azure: AzureConfig {
                org: "contoso".into(),
                pat: "pat".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!config.is_configured());
        config.project = "ehr".into();
        assert!(config.is_configured());
    }

    #[test]
    fn fixture_needs_path() {
        let config = TrackerConfig {
            provider: TrackerProvider::Fixture,
            fixture_path: "bugs.json".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }
}
