//! Jira Cloud/Server client (REST API v2 issue search).

use std::time::Duration;

use async_trait::async_trait;
use hq_config::JiraConfig;

use crate::{BugTracker, TrackerRecord, error::TrackerError, http::{build_client, check_response}};

#[derive(serde::Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<Issue>,
}

#[derive(serde::Deserialize)]
struct Issue {
    key: String,
    fields: IssueFields,
}

#[derive(serde::Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub struct JiraTracker {
    http: reqwest::Client,
    base_url: String,
    email: String,
    api_token: String,
}

impl JiraTracker {
    #[must_use]
    pub fn new(config: &JiraConfig, timeout: Duration) -> Self {
        Self {
            http: build_client(timeout),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
        }
    }

    fn search_url(&self, project: &str, limit: usize) -> String {
        format!(
            "{}/rest/api/2/search?jql={}&maxResults={limit}&fields=summary,description",
            self.base_url,
            urlencoding::encode(&jql(project))
        )
    }
}

/// Bugs, newest update first, optionally scoped to one project.
fn jql(project: &str) -> String {
    if project.is_empty() {
        "issuetype=Bug ORDER BY updated DESC".to_string()
    } else {
        format!(
            "project=\"{}\" AND issuetype=Bug ORDER BY updated DESC",
            project.replace('"', "\\\"")
        )
    }
}

fn to_record(issue: Issue) -> TrackerRecord {
    TrackerRecord {
        external_id: Some(issue.key),
        title: issue.fields.summary.unwrap_or_default(),
        description: issue.fields.description.unwrap_or_default(),
        related_requirements: Vec::new(),
    }
}

#[async_trait]
impl BugTracker for JiraTracker {
    fn name(&self) -> &'static str {
        "jira"
    }

    async fn fetch_recent(
        &self,
        project: &str,
        limit: usize,
    ) -> Result<Vec<TrackerRecord>, TrackerError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let url = self.search_url(project, limit);
        let resp = check_response(
            self.http
                .get(&url)
                .basic_auth(&self.email, Some(&self.api_token))
                .send()
                .await?,
        )
        .await?;

        let data: SearchResponse = resp
            .json()
            .await
            .map_err(|e| TrackerError::Parse(format!("jira search response: {e}")))?;
        let records: Vec<TrackerRecord> = data.issues.into_iter().take(limit).map(to_record).collect();
        tracing::debug!(project, records = records.len(), "fetched jira issues");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const FIXTURE: &str = r#"{
        "startAt": 0,
        "maxResults": 2,
        "total": 17,
        "issues": [
            {
                "key": "EHR-101",
                "fields": {
                    "summary": "Lookup returns stale patient",
                    "description": "Reported by nurse on 2024-02-01"
                }
            },
            {
                "key": "EHR-99",
                "fields": { "summary": "Export times out", "description": null }
            }
        ]
    }"#;

    #[test]
    fn parse_search_response() {
        let data: SearchResponse = serde_json::from_str(FIXTURE).unwrap();
        let records: Vec<_> = data.issues.into_iter().map(to_record).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].external_id.as_deref(), Some("EHR-101"));
        assert_eq!(records[0].title, "Lookup returns stale patient");
        assert_eq!(records[1].description, "");
    }

    #[test]
    fn jql_scopes_project_when_given() {
        assert_eq!(jql(""), "issuetype=Bug ORDER BY updated DESC");
        assert_eq!(
            jql("EHR"),
            "project=\"EHR\" AND issuetype=Bug ORDER BY updated DESC"
        );
    }

    #[test]
    fn search_url_encodes_jql() {
        let tracker = JiraTracker::new(
            &JiraConfig {
                base_url: "https://example.atlassian.net/".into(),
                email: "qa@example.com".into(),
                api_token: "t".into(),
            },
            Duration::from_secs(1),
        );
        let url = tracker.search_url("", 5);
        assert!(url.starts_with("https://example.atlassian.net/rest/api/2/search?jql="));
        assert!(url.contains("issuetype%3DBug%20ORDER%20BY%20updated%20DESC"));
        assert!(url.contains("&maxResults=5"));
    }
}
