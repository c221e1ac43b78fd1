//! Summary and response types shared between pipeline stages and `hqa`.
//!
//! These structs define the JSON shape of `hqa run`, `hqa coverage`, and the
//! validator's results as logged to the metrics store.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A test that could not be executed, or executed and failed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestFailure {
    pub test_id: String,
    pub message: String,
}

/// Result of validating one batch of generated tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ValidationSummary {
    pub passed: u32,
    pub total: u32,
    /// Aggregate coverage estimate in `[0.0, 1.0]`.
    pub coverage: f64,
    pub failures: Vec<TestFailure>,
}

impl ValidationSummary {
    /// Zero-total, zero-coverage result used when nothing could be executed.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Aggregated metrics read back from the metrics store.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CoverageMetrics {
    pub coverage: f64,
    pub risk_score: f64,
}

/// Per-stage input counts for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StageCounts {
    pub requirements: u32,
    pub symbols: u32,
    pub bugs: u32,
    pub intents: u32,
    pub tests: u32,
    /// Intents dropped because synthesis could not produce clean code.
    pub rejected: u32,
}

/// Response from `hqa run` and `hqa dry-run`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RunSummary {
    pub run_id: String,
    pub tests_generated: u32,
    pub test_paths: Vec<String>,
    pub validation: ValidationSummary,
    pub traceability_path: String,
    pub counts: StageCounts,
    /// Human-readable notes for every stage that degraded to empty output.
    pub degraded: Vec<String>,
}
