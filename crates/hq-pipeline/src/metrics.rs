//! Metrics-store collaborator: `log(results)` and `query_recent(dataset)`.
//!
//! Callers treat every error from a store as log-and-continue; nothing here
//! fails a run.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hq_config::{MetricsBackend, MetricsConfig};
use hq_core::responses::{CoverageMetrics, ValidationSummary};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::PipelineError;

/// How many of the most recent records `query_recent` averages.
pub const RECENT_WINDOW: usize = 10;

/// One logged validation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub dataset: String,
    pub coverage: f64,
    /// Share of failed tests, `0.0` when nothing ran.
    pub risk_score: f64,
    pub passed: u32,
    pub total: u32,
    pub recorded_at: DateTime<Utc>,
}

impl MetricsRecord {
    #[must_use]
    pub fn from_summary(dataset: &str, summary: &ValidationSummary) -> Self {
        let risk_score = if summary.total == 0 {
            0.0
        } else {
            f64::from(summary.total - summary.passed.min(summary.total)) / f64::from(summary.total)
        };
        Self {
            dataset: dataset.to_string(),
            coverage: summary.coverage,
            risk_score,
            passed: summary.passed,
            total: summary.total,
            recorded_at: Utc::now(),
        }
    }
}

/// Mean coverage and risk of the last [`RECENT_WINDOW`] records for `dataset`.
#[must_use]
pub fn summarize_recent<'a>(
    records: impl DoubleEndedIterator<Item = &'a MetricsRecord>,
    dataset: &str,
) -> CoverageMetrics {
    let recent: Vec<&MetricsRecord> = records
        .rev()
        .filter(|r| r.dataset == dataset)
        .take(RECENT_WINDOW)
        .collect();
    if recent.is_empty() {
        return CoverageMetrics::default();
    }
    #[allow(clippy::cast_precision_loss)]
    let n = recent.len() as f64;
    CoverageMetrics {
        coverage: recent.iter().map(|r| r.coverage).sum::<f64>() / n,
        risk_score: recent.iter().map(|r| r.risk_score).sum::<f64>() / n,
    }
}

#[async_trait]
pub trait MetricsStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// [`PipelineError::ProviderUnreachable`] if the record cannot be stored.
    async fn log(&self, record: &MetricsRecord) -> Result<(), PipelineError>;

    /// # Errors
    ///
    /// [`PipelineError::ProviderUnreachable`] if the store cannot be read.
    async fn query_recent(&self, dataset: &str) -> Result<CoverageMetrics, PipelineError>;
}

// ── In-memory ──────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryMetricsStore {
    records: RwLock<Vec<MetricsRecord>>,
}

impl InMemoryMetricsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<MetricsRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl MetricsStore for InMemoryMetricsStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn log(&self, record: &MetricsRecord) -> Result<(), PipelineError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn query_recent(&self, dataset: &str) -> Result<CoverageMetrics, PipelineError> {
        let records = self.records.read().await;
        Ok(summarize_recent(records.iter(), dataset))
    }
}

// ── JSON Lines file ────────────────────────────────────────────────

/// Append-only `.jsonl` file, one [`MetricsRecord`] per line.
#[derive(Debug, Clone)]
pub struct JsonlMetricsStore {
    path: PathBuf,
}

impl JsonlMetricsStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(path: &std::path::Path) -> std::io::Result<Vec<MetricsRecord>> {
        match serde_jsonlines::json_lines::<MetricsRecord, _>(path) {
            Ok(lines) => lines.collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

fn store_error(e: impl ToString) -> PipelineError {
    PipelineError::unreachable("metrics store", e)
}

#[async_trait]
impl MetricsStore for JsonlMetricsStore {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    async fn log(&self, record: &MetricsRecord) -> Result<(), PipelineError> {
        let path = self.path.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            serde_jsonlines::append_json_lines(&path, [&record])
        })
        .await
        .map_err(store_error)?
        .map_err(store_error)
    }

    async fn query_recent(&self, dataset: &str) -> Result<CoverageMetrics, PipelineError> {
        let path = self.path.clone();
        let records = tokio::task::spawn_blocking(move || Self::read_all(&path))
            .await
            .map_err(store_error)?
            .map_err(store_error)?;
        Ok(summarize_recent(records.iter(), dataset))
    }
}

// ── Remote ─────────────────────────────────────────────────────────

/// HTTP metrics warehouse.
///
/// - `POST {endpoint}/datasets/{dataset}/records` with a [`MetricsRecord`]
/// - `GET {endpoint}/datasets/{dataset}/recent` answering [`CoverageMetrics`]
pub struct HttpMetricsStore {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpMetricsStore {
    #[must_use]
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            http: hq_trackers::build_client(timeout),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn dataset_url(&self, dataset: &str) -> String {
        format!("{}/datasets/{}", self.endpoint, urlencoding::encode(dataset))
    }
}

#[async_trait]
impl MetricsStore for HttpMetricsStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn log(&self, record: &MetricsRecord) -> Result<(), PipelineError> {
        let url = format!("{}/records", self.dataset_url(&record.dataset));
        let resp = self.http.post(&url).json(record).send().await.map_err(store_error)?;
        resp.error_for_status().map_err(store_error)?;
        Ok(())
    }

    async fn query_recent(&self, dataset: &str) -> Result<CoverageMetrics, PipelineError> {
        let url = format!("{}/recent", self.dataset_url(dataset));
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(store_error)?
            .error_for_status()
            .map_err(store_error)?;
        resp.json().await.map_err(store_error)
    }
}

/// Build the store selected by configuration.
///
/// # Errors
///
/// Returns [`PipelineError::ProviderUnconfigured`] when the selected backend
/// is missing its path or endpoint.
pub fn metrics_store_from_config(
    config: &MetricsConfig,
    timeout: Duration,
) -> Result<Box<dyn MetricsStore>, PipelineError> {
    if !config.is_configured() {
        return Err(PipelineError::unconfigured(
            "metrics store",
            "jsonl needs a path, remote needs an endpoint",
        ));
    }
    let store: Box<dyn MetricsStore> = match config.backend {
        MetricsBackend::Memory => Box::new(InMemoryMetricsStore::new()),
        MetricsBackend::Jsonl => Box::new(JsonlMetricsStore::new(&config.path)),
        MetricsBackend::Remote => Box::new(HttpMetricsStore::new(&config.endpoint, timeout)),
    };
    Ok(store)
}
