//! Validator: execute or simulate generated tests and summarize the batch.
//!
//! Per-test failures are recorded in [`ValidationSummary::failures`] and never
//! abort the batch. When nothing can run at all (no tests, no runner on
//! `PATH`) the result is [`ValidationSummary::empty`].

use std::process::Stdio;
use std::time::Duration;

use chrono::Utc;
use hq_config::{ValidatorConfig, ValidatorMode};
use hq_core::entities::GeneratedTest;
use hq_core::responses::{TestFailure, ValidationSummary};
use tokio::process::Command;

use crate::metrics::{MetricsRecord, MetricsStore};

enum Outcome {
    Passed,
    Failed(String),
    /// The runner itself could not be started.
    NoRunner(String),
}

pub struct Validator<'a> {
    config: ValidatorConfig,
    metrics: &'a dyn MetricsStore,
    dataset: String,
    timeout: Duration,
}

impl<'a> Validator<'a> {
    #[must_use]
    pub fn new(
        config: ValidatorConfig,
        metrics: &'a dyn MetricsStore,
        dataset: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            config,
            metrics,
            dataset: dataset.to_string(),
            timeout,
        }
    }

    /// Run every test, set `passed` and `last_run_at` on each one that ran,
    /// and log the summary to the metrics store.
    pub async fn validate(&self, tests: &mut [GeneratedTest]) -> ValidationSummary {
        let summary = match self.config.mode {
            ValidatorMode::Simulate => self.simulate(tests),
            ValidatorMode::Process => self.execute(tests).await,
        };
        self.log(&summary).await;
        summary
    }

    /// Offline mode: a test passes iff its code passes the PHI guard.
    fn simulate(&self, tests: &mut [GeneratedTest]) -> ValidationSummary {
        let now = Utc::now();
        let outcomes: Vec<Outcome> = tests
            .iter()
            .map(|test| match hq_redact::assert_clean(&test.code) {
                Ok(()) => Outcome::Passed,
                Err(e) => Outcome::Failed(e.to_string()),
            })
            .collect();
        self.summarize(tests, outcomes, now)
    }

    async fn execute(&self, tests: &mut [GeneratedTest]) -> ValidationSummary {
        let now = Utc::now();
        let mut outcomes = Vec::with_capacity(tests.len());
        for test in tests.iter() {
            let outcome = self.run_one(test).await;
            if let Outcome::NoRunner(reason) = &outcome {
                tracing::warn!(runner = %self.config.runner, %reason, "test runner unavailable");
                return ValidationSummary::empty();
            }
            outcomes.push(outcome);
        }
        self.summarize(tests, outcomes, now)
    }

    async fn run_one(&self, test: &GeneratedTest) -> Outcome {
        let Some(path) = test.path() else {
            return Outcome::Failed("test was not written to disk".to_string());
        };
        if let Err(e) = hq_redact::assert_clean(&test.code) {
            return Outcome::Failed(e.to_string());
        }

        let mut command = Command::new(&self.config.runner);
        command
            .args(&self.config.runner_args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => return Outcome::NoRunner(e.to_string()),
        };
        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => Outcome::Passed,
            Ok(Ok(status)) => Outcome::Failed(format!("runner exited with {status}")),
            Ok(Err(e)) => Outcome::Failed(e.to_string()),
            Err(_) => Outcome::Failed(format!("timed out after {:?}", self.timeout)),
        }
    }

    fn summarize(
        &self,
        tests: &mut [GeneratedTest],
        outcomes: Vec<Outcome>,
        now: chrono::DateTime<Utc>,
    ) -> ValidationSummary {
        if tests.is_empty() {
            return ValidationSummary::empty();
        }
        let mut summary = ValidationSummary::empty();
        for (test, outcome) in tests.iter_mut().zip(outcomes) {
            summary.total += 1;
            test.last_run_at = Some(now);
            match outcome {
                Outcome::Passed => {
                    summary.passed += 1;
                    test.passed = Some(true);
                }
                Outcome::Failed(message) | Outcome::NoRunner(message) => {
                    test.passed = Some(false);
                    summary.failures.push(TestFailure {
                        test_id: test.id.clone(),
                        message,
                    });
                }
            }
        }
        let pass_rate = f64::from(summary.passed) / f64::from(summary.total);
        summary.coverage = match self.config.mode {
            ValidatorMode::Simulate => self.config.simulated_coverage * pass_rate,
            ValidatorMode::Process => pass_rate,
        }
        .clamp(0.0, 1.0);
        summary
    }

    async fn log(&self, summary: &ValidationSummary) {
        let record = MetricsRecord::from_summary(&self.dataset, summary);
        if let Err(e) = self.metrics.log(&record).await {
            tracing::warn!(store = self.metrics.name(), %e, "failed to log validation metrics");
        }
    }
}
