//! Fixture tracker: reads bugs from a local JSON file.
//!
//! File format: `{"bugs": [{"title": .., "description": .., "related_requirements": [..]}]}`.
//! Entries are taken to be in recency order already.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::{BugTracker, TrackerRecord, error::TrackerError};

#[derive(serde::Deserialize)]
struct FixtureFile {
    #[serde(default)]
    bugs: Vec<TrackerRecord>,
}

pub struct FixtureTracker {
    path: PathBuf,
}

impl FixtureTracker {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parse fixture JSON, keeping at most `limit` entries.
///
/// # Errors
///
/// Returns [`TrackerError::Parse`] for malformed JSON.
pub fn parse_fixture(raw: &str, limit: usize) -> Result<Vec<TrackerRecord>, TrackerError> {
    let file: FixtureFile =
        serde_json::from_str(raw).map_err(|e| TrackerError::Parse(format!("bug fixture: {e}")))?;
    Ok(file.bugs.into_iter().take(limit).collect())
}

#[async_trait]
impl BugTracker for FixtureTracker {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn fetch_recent(
        &self,
        _project: &str,
        limit: usize,
    ) -> Result<Vec<TrackerRecord>, TrackerError> {
        let raw = tokio::fs::read_to_string(&self.path).await.inspect_err(|e| {
            tracing::warn!(path = %self.path.display(), %e, "bug fixture unreadable");
        })?;
        let records = parse_fixture(&raw, limit)?;
        tracing::debug!(path = %self.path.display(), records = records.len(), "loaded bug fixture");
        Ok(records)
    }
}
