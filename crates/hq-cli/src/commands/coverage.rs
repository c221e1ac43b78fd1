use anyhow::Context;
use hq_config::HqConfig;
use hq_pipeline::metrics::{RECENT_WINDOW, metrics_store_from_config};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CoverageArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct CoverageResponse {
    dataset: String,
    store: &'static str,
    window: usize,
    coverage: f64,
    risk_score: f64,
}

/// Handle `hqa coverage`.
pub async fn handle(
    args: &CoverageArgs,
    config: &HqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let store = metrics_store_from_config(&config.metrics, config.general.io_timeout())
        .context("metrics store is not usable")?;
    let dataset = args
        .dataset
        .clone()
        .unwrap_or_else(|| config.metrics.dataset.clone());

    let metrics = store
        .query_recent(&dataset)
        .await
        .with_context(|| format!("failed to query recent metrics for {dataset}"))?;

    output(
        &CoverageResponse {
            dataset,
            store: store.name(),
            window: RECENT_WINDOW,
            coverage: metrics.coverage,
            risk_score: metrics.risk_score,
        },
        flags.format,
    )
}
