//! # hq-pipeline
//!
//! The requirement-to-test pipeline for healthqa.
//!
//! Stages, in run order:
//! - [`normalizer`]: raw requirement text to tagged, redacted requirements
//! - [`extractor`]: code units (via a [`code_store::CodeStore`]) to symbols
//! - [`ingest`]: bug-tracker records to redacted bugs
//! - [`planner`]: symbols, requirements and bugs to test intents
//! - [`synthesizer`]: intents to guarded test code (via a [`synthesizer::CodeModel`])
//! - [`validator`]: execute or simulate tests, log to a [`metrics::MetricsStore`]
//! - [`traceability`]: atomic CSV export of test → requirement
//!
//! [`coordinator::Coordinator`] runs them once each, in order, and turns
//! every stage failure except export into degraded output.

pub mod code_store;
pub mod coordinator;
pub mod extractor;
pub mod ingest;
pub mod metrics;
pub mod normalizer;
pub mod planner;
pub mod synthesizer;
pub mod traceability;
pub mod validator;

mod error;

pub use coordinator::{Collaborators, Coordinator, RunInput, RunOutput};
pub use error::PipelineError;
pub use extractor::CodeUnit;
