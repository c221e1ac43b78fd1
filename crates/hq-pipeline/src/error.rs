//! Pipeline error taxonomy.
//!
//! Every stage maps its failures onto these variants. All of them except
//! [`PipelineError::ExportFailure`] are converted to empty or degraded output
//! at the stage boundary; the coordinator only returns `Err` for an export
//! failure or a broken state machine.

use hq_core::errors::CoreError;
use hq_redact::PhiDetected;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Text about to be persisted or executed still matches a PHI/PII pattern.
    #[error(transparent)]
    PhiDetected(#[from] PhiDetected),

    /// A code unit could not be loaded from its store.
    #[error("source unavailable for '{path}': {reason}")]
    SourceUnavailable { path: String, reason: String },

    /// A collaborator is selected but lacks credentials or settings.
    #[error("{provider} is not configured: {reason}")]
    ProviderUnconfigured { provider: String, reason: String },

    /// A collaborator failed or timed out.
    #[error("{provider} is unreachable: {reason}")]
    ProviderUnreachable { provider: String, reason: String },

    /// A code unit is not valid source for its language.
    #[error("could not parse '{unit}': {reason}")]
    ParseFailure { unit: String, reason: String },

    /// The traceability file could not be written.
    #[error("failed to write traceability file '{path}': {source}")]
    ExportFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The coordinator attempted an illegal state transition.
    #[error(transparent)]
    State(#[from] CoreError),
}

impl PipelineError {
    pub(crate) fn unreachable(provider: &str, reason: impl ToString) -> Self {
        Self::ProviderUnreachable {
            provider: provider.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unconfigured(provider: &str, reason: impl ToString) -> Self {
        Self::ProviderUnconfigured {
            provider: provider.to_string(),
            reason: reason.to_string(),
        }
    }
}
