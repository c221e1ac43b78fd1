//! # hq-trackers
//!
//! Bug-tracker clients for healthqa. Each provider implements [`BugTracker`]
//! and returns raw [`TrackerRecord`]s, most recently updated first:
//! - Jira (REST v2 search, basic auth with email + API token)
//! - Azure DevOps (WIQL query, then a work-item batch fetch; PAT auth)
//! - a JSON fixture file for offline runs
//!
//! Records are returned unredacted. Redaction happens in the ingestor that
//! turns them into bug entities.

pub mod azure;
pub mod fixture;
pub mod jira;

mod error;
mod http;

pub use azure::AzureDevOpsTracker;
pub use error::TrackerError;
pub use fixture::FixtureTracker;
pub use http::build_client;
pub use jira::JiraTracker;

use std::time::Duration;

use async_trait::async_trait;
use hq_config::{TrackerConfig, TrackerProvider};
use serde::{Deserialize, Serialize};

// ── Types ──────────────────────────────────────────────────────────

/// A bug as the tracker reports it, before redaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerRecord {
    /// Provider-native key (`HQA-42`, work item `1234`). Fixtures may omit it.
    #[serde(default)]
    pub external_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Requirement IDs the reporter linked. Only fixtures carry these.
    #[serde(default)]
    pub related_requirements: Vec<String>,
}

// ── Trait ──────────────────────────────────────────────────────────

/// Capability interface for fetching recent bugs.
#[async_trait]
pub trait BugTracker: Send + Sync {
    /// Provider name for logs (`jira`, `azure`, `fixture`).
    fn name(&self) -> &'static str;

    /// Fetch at most `limit` bugs, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] on transport, status, or parse failures.
    async fn fetch_recent(
        &self,
        project: &str,
        limit: usize,
    ) -> Result<Vec<TrackerRecord>, TrackerError>;
}

/// Build the tracker selected by configuration.
///
/// # Errors
///
/// Returns [`TrackerError::Unconfigured`] when the provider is `none` or its
/// required settings are missing.
pub fn tracker_from_config(
    config: &TrackerConfig,
    timeout: Duration,
) -> Result<Box<dyn BugTracker>, TrackerError> {
    match config.provider {
        TrackerProvider::None => Err(TrackerError::Unconfigured {
            provider: "none",
            reason: "no tracker provider selected".to_string(),
        }),
        TrackerProvider::Jira => {
            if !config.jira.is_configured() {
                return Err(TrackerError::Unconfigured {
                    provider: "jira",
                    reason: "base_url, email and api_token are required".to_string(),
                });
            }
            Ok(Box::new(JiraTracker::new(&config.jira, timeout)))
        }
        TrackerProvider::Azure => {
            if !config.azure.is_configured() || config.project.is_empty() {
                return Err(TrackerError::Unconfigured {
                    provider: "azure",
                    reason: "org, pat and project are required".to_string(),
                });
            }
            Ok(Box::new(AzureDevOpsTracker::new(&config.azure, timeout)))
        }
        TrackerProvider::Fixture => {
            if config.fixture_path.is_empty() {
                return Err(TrackerError::Unconfigured {
                    provider: "fixture",
                    reason: "fixture_path is required".to_string(),
                });
            }
            Ok(Box::new(FixtureTracker::new(&config.fixture_path)))
        }
    }
}

#[cfg(test)]
mod tests {
    use hq_config::{AzureConfig, JiraConfig};

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[test]
    fn record_deserializes_with_optional_fields_missing() {
        let record: TrackerRecord =
            serde_json::from_str(r#"{"title": "Crash on save"}"#).unwrap();
        assert_eq!(record.title, "Crash on save");
        assert!(record.description.is_empty());
        assert!(record.external_id.is_none());
        assert!(record.related_requirements.is_empty());
    }

    #[test]
    fn no_provider_is_unconfigured() {
        let err = tracker_from_config(&TrackerConfig::default(), TIMEOUT)
            .err()
            .expect("unconfigured");
        assert!(err.is_unconfigured());
    }

    #[test]
    fn jira_without_token_is_unconfigured() {
        let config = TrackerConfig {
            provider: TrackerProvider::Jira,
            jira: JiraConfig {
                base_url: "https://example.atlassian.net".into(),
                email: "qa@example.com".into(),
                api_token: String::new(),
            },
            ..Default::default()
        };
        let err = tracker_from_config(&config, TIMEOUT).err().expect("unconfigured");
        assert!(matches!(err, TrackerError::Unconfigured { provider: "jira", .. }));
    }

    #[test]
    fn azure_without_project_is_unconfigured() {
        let config = TrackerConfig {
            provider: TrackerProvider::Azure,
            azure: AzureConfig {
                org: "contoso".into(),
                pat: "pat".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(tracker_from_config(&config, TIMEOUT).is_err());
    }

    #[test]
    fn configured_providers_build() {
        let config = TrackerConfig {
            provider: TrackerProvider::Fixture,
            fixture_path: "bugs.json".into(),
            ..Default::default()
        };
        let tracker = tracker_from_config(&config, TIMEOUT).expect("fixture tracker");
        assert_eq!(tracker.name(), "fixture");
    }
}
