//! Coordinator: runs every stage once, in state-machine order.
//!
//! ```text
//! idle → parsing_requirements → analyzing_code → fetching_bugs → planning
//!      → synthesizing → validating → exporting → done
//! ```
//!
//! Stage failures degrade that stage's output and are reported in
//! [`RunSummary::degraded`]. Only an export failure (or a broken state
//! machine) makes [`Coordinator::run`] return `Err`.

use std::path::PathBuf;

use hq_config::HqConfig;
use hq_core::entities::{BugItem, CodeSymbol, GeneratedTest, Requirement, TestIntent};
use hq_core::enums::PipelineState;
use hq_core::ids::{PREFIX_RUN, generate_id};
use hq_core::responses::{RunSummary, StageCounts, ValidationSummary};
use hq_trackers::BugTracker;

use crate::code_store::{CodeStore, InMemoryCodeStore, code_store_from_config};
use crate::error::PipelineError;
use crate::extractor::{CodeUnit, SymbolExtractor};
use crate::ingest::BugIngestor;
use crate::metrics::{InMemoryMetricsStore, MetricsStore, metrics_store_from_config};
use crate::normalizer::{LanguageDetector, RequirementNormalizer, ScriptRangeDetector};
use crate::planner;
use crate::synthesizer::{
    CodeModel, Guard, TemplateModel, TestSynthesizer, code_model_from_config, sanitize,
};
use crate::traceability;
use crate::validator::Validator;

/// External collaborators, one per capability.
pub struct Collaborators {
    pub code_store: Box<dyn CodeStore>,
    pub ingestor: BugIngestor,
    pub model: Box<dyn CodeModel>,
    pub metrics: Box<dyn MetricsStore>,
    pub detector: Box<dyn LanguageDetector>,
    /// Check applied to every generated test before it is kept.
    pub guard: Guard,
    /// Fallbacks taken while building from configuration.
    pub notes: Vec<String>,
}

impl Collaborators {
    /// Select every collaborator from configuration. An unusable selection
    /// falls back (empty code store, template model, in-memory metrics) and
    /// is recorded in `notes`.
    #[must_use]
    pub fn from_config(config: &HqConfig) -> Self {
        let timeout = config.general.io_timeout();
        let mut notes = Vec::new();

        let code_store = code_store_from_config(&config.storage, timeout).unwrap_or_else(|e| {
            tracing::warn!(%e, "code store unusable, every code path will be unavailable");
            notes.push(format!("code store: {e}"));
            Box::new(InMemoryCodeStore::new())
        });
        let model = code_model_from_config(&config.model, timeout).unwrap_or_else(|e| {
            tracing::warn!(%e, "code model unusable, using template synthesis");
            notes.push(format!("code model: {e}"));
            Box::new(TemplateModel)
        });
        let metrics = metrics_store_from_config(&config.metrics, timeout).unwrap_or_else(|e| {
            tracing::warn!(%e, "metrics store unusable, keeping metrics in memory");
            notes.push(format!("metrics store: {e}"));
            Box::new(InMemoryMetricsStore::new())
        });

        Self {
            code_store,
            ingestor: BugIngestor::from_config(&config.tracker, timeout),
            model,
            metrics,
            detector: Box::new(ScriptRangeDetector),
            guard: sanitize,
            notes,
        }
    }

    /// Replace the bug tracker, keeping the configured project and limit.
    #[must_use]
    pub fn with_tracker(mut self, tracker: Box<dyn BugTracker>, config: &HqConfig) -> Self {
        self.ingestor = BugIngestor::new(
            tracker,
            &config.tracker.project,
            config.tracker.limit,
            config.general.io_timeout(),
        );
        self
    }

    #[must_use]
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    #[must_use]
    pub fn with_code_store(mut self, store: Box<dyn CodeStore>) -> Self {
        self.code_store = store;
        self
    }
}

/// Inputs for one run.
#[derive(Debug, Clone, Default)]
pub struct RunInput {
    pub requirements: Vec<String>,
    pub code_units: Vec<CodeUnit>,
}

/// Everything one run produced.
#[derive(Debug)]
pub struct RunOutput {
    pub requirements: Vec<Requirement>,
    pub symbols: Vec<CodeSymbol>,
    pub bugs: Vec<BugItem>,
    pub intents: Vec<TestIntent>,
    pub tests: Vec<GeneratedTest>,
    pub validation: ValidationSummary,
    pub summary: RunSummary,
}

pub struct Coordinator {
    config: HqConfig,
    collaborators: Collaborators,
    normalizer: RequirementNormalizer,
}

struct Run {
    id: String,
    state: PipelineState,
}

impl Run {
    fn advance(&mut self, next: PipelineState) -> Result<(), PipelineError> {
        let from = self.state;
        self.state = from.transition(next)?;
        tracing::info!(run_id = %self.id, %from, to = %next, "pipeline state");
        Ok(())
    }
}

impl Coordinator {
    #[must_use]
    pub fn new(config: HqConfig, mut collaborators: Collaborators) -> Self {
        let detector = std::mem::replace(&mut collaborators.detector, Box::new(ScriptRangeDetector));
        let normalizer = RequirementNormalizer::new(detector, config.general.title_max_chars);
        Self {
            config,
            collaborators,
            normalizer,
        }
    }

    #[must_use]
    pub fn from_config(config: HqConfig) -> Self {
        let collaborators = Collaborators::from_config(&config);
        Self::new(config, collaborators)
    }

    #[must_use]
    pub const fn config(&self) -> &HqConfig {
        &self.config
    }

    /// Run every stage once.
    ///
    /// # Errors
    ///
    /// [`PipelineError::ExportFailure`] if the traceability file cannot be
    /// written, [`PipelineError::State`] on an illegal transition.
    pub async fn run(&self, input: RunInput) -> Result<RunOutput, PipelineError> {
        let timeout = self.config.general.io_timeout();
        let mut run = Run {
            id: generate_id(PREFIX_RUN),
            state: PipelineState::Idle,
        };
        let mut degraded = self.collaborators.notes.clone();

        run.advance(PipelineState::ParsingRequirements)?;
        let requirements = self.normalizer.normalize(&input.requirements);

        run.advance(PipelineState::AnalyzingCode)?;
        let extraction = SymbolExtractor::new(self.collaborators.code_store.as_ref(), timeout)
            .extract_all(&input.code_units)
            .await;
        degraded.extend(
            extraction
                .failures
                .iter()
                .map(|(unit, e)| format!("code unit {unit}: {e}")),
        );
        let symbols = extraction.symbols;

        run.advance(PipelineState::FetchingBugs)?;
        let bugs = match self.collaborators.ingestor.try_ingest().await {
            Ok(bugs) => bugs,
            Err(e) => {
                tracing::warn!(run_id = %run.id, %e, "bug ingestion degraded to empty");
                degraded.push(format!("bug tracker: {e}"));
                Vec::new()
            }
        };

        run.advance(PipelineState::Planning)?;
        let intents = planner::plan(&requirements, &symbols, &bugs);

        run.advance(PipelineState::Synthesizing)?;
        let output_dir = PathBuf::from(&self.config.general.output_dir);
        let synthesis = TestSynthesizer::new(self.collaborators.model.as_ref(), Some(output_dir), timeout)
            .with_guard(self.collaborators.guard)
            .synthesize_all(&intents)
            .await;
        degraded.extend(
            synthesis
                .rejected
                .iter()
                .map(|(intent, e)| format!("intent {intent}: {e}")),
        );
        let rejected = synthesis.rejected.len();
        let mut tests = synthesis.tests;

        run.advance(PipelineState::Validating)?;
        let validation = Validator::new(
            self.config.validator.clone(),
            self.collaborators.metrics.as_ref(),
            &self.config.metrics.dataset,
            timeout,
        )
        .validate(&mut tests)
        .await;
        if validation.total == 0 && !tests.is_empty() {
            degraded.push("validator: no generated test could be executed".to_string());
        }

        run.advance(PipelineState::Exporting)?;
        let traceability_path = PathBuf::from(&self.config.general.traceability_path);
        traceability::export(&traceability_path, &tests, &intents, &requirements)?;

        run.advance(PipelineState::Done)?;

        let summary = RunSummary {
            run_id: run.id,
            tests_generated: count(tests.len()),
            test_paths: tests
                .iter()
                .filter_map(|t| t.path().map(String::from))
                .collect(),
            validation: validation.clone(),
            traceability_path: traceability_path.display().to_string(),
            counts: StageCounts {
                requirements: count(requirements.len()),
                symbols: count(symbols.len()),
                bugs: count(bugs.len()),
                intents: count(intents.len()),
                tests: count(tests.len()),
                rejected: count(rejected),
            },
            degraded,
        };

        Ok(RunOutput {
            requirements,
            symbols,
            bugs,
            intents,
            tests,
            validation,
            summary,
        })
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
