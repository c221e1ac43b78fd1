//! Bug ingestor: tracker records to redacted [`BugItem`]s.
//!
//! Fail-open. A missing provider, missing credentials, a transport error, or
//! a timeout all yield an empty list; [`BugIngestor::try_ingest`] exposes the
//! cause for callers that want to report it.

use std::time::Duration;

use chrono::Utc;
use hq_config::TrackerConfig;
use hq_core::entities::BugItem;
use hq_core::enums::BugStatus;
use hq_core::ids::{PREFIX_BUG, generate_id};
use hq_trackers::{BugTracker, TrackerError, TrackerRecord, tracker_from_config};

use crate::error::PipelineError;

pub struct BugIngestor {
    tracker: Result<Box<dyn BugTracker>, TrackerError>,
    project: String,
    limit: usize,
    timeout: Duration,
}

impl BugIngestor {
    #[must_use]
    pub fn new(tracker: Box<dyn BugTracker>, project: &str, limit: usize, timeout: Duration) -> Self {
        Self {
            tracker: Ok(tracker),
            project: project.to_string(),
            limit,
            timeout,
        }
    }

    /// Build from configuration. An unusable provider is remembered and
    /// reported on every ingest rather than failing construction.
    #[must_use]
    pub fn from_config(config: &TrackerConfig, timeout: Duration) -> Self {
        Self {
            tracker: tracker_from_config(config, timeout),
            project: config.project.clone(),
            limit: config.limit,
            timeout,
        }
    }

    /// Fetch, redact, and convert at most `limit` bugs. Empty on any failure.
    pub async fn ingest(&self) -> Vec<BugItem> {
        match self.try_ingest().await {
            Ok(bugs) => bugs,
            Err(e) => {
                tracing::warn!(%e, "bug ingestion degraded to empty");
                Vec::new()
            }
        }
    }

    /// # Errors
    ///
    /// [`PipelineError::ProviderUnconfigured`] or
    /// [`PipelineError::ProviderUnreachable`].
    pub async fn try_ingest(&self) -> Result<Vec<BugItem>, PipelineError> {
        let tracker = match &self.tracker {
            Ok(tracker) => tracker,
            Err(TrackerError::Unconfigured { provider, reason }) => {
                return Err(PipelineError::unconfigured(provider, reason));
            }
            Err(other) => return Err(PipelineError::unconfigured("tracker", other)),
        };
        if self.limit == 0 {
            return Ok(Vec::new());
        }

        let records = tokio::time::timeout(
            self.timeout,
            tracker.fetch_recent(&self.project, self.limit),
        )
        .await
        .map_err(|_| {
            PipelineError::unreachable(
                tracker.name(),
                format!("timed out after {:?}", self.timeout),
            )
        })?
        .map_err(into_pipeline_error)?;

        let bugs: Vec<BugItem> = records
            .into_iter()
            .take(self.limit)
            .map(to_bug_item)
            .collect();
        tracing::debug!(provider = tracker.name(), bugs = bugs.len(), "ingested bugs");
        Ok(bugs)
    }
}

fn into_pipeline_error(e: TrackerError) -> PipelineError {
    match e {
        TrackerError::Unconfigured { provider, reason } => {
            PipelineError::unconfigured(provider, reason)
        }
        other => PipelineError::unreachable("tracker", other),
    }
}

/// Status is always [`BugStatus::Open`]; provider states are not mapped.
#[must_use]
pub fn to_bug_item(record: TrackerRecord) -> BugItem {
    BugItem {
        id: generate_id(PREFIX_BUG),
        external_id: record.external_id,
        title: hq_redact::redact(&record.title),
        description: hq_redact::redact(&record.description),
        status: BugStatus::Open,
        related_requirements: record.related_requirements,
        created_at: Utc::now(),
        resolved_at: None,
    }
}
