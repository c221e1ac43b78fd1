use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline once and write the traceability file.
    Run(RunArgs),
    /// Mask PHI/PII in text.
    Redact(RedactArgs),
    /// Fail if a file still contains PHI/PII-shaped text.
    Scan(ScanArgs),
    /// Extract functions and classes from one code unit.
    Extract(ExtractArgs),
    /// Report recent coverage and risk from the metrics store.
    Coverage(CoverageArgs),
    /// Self-test the pipeline against built-in fixtures.
    DryRun(DryRunArgs),
    /// Print the JSON schema of an entity or response type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    /// Requirement text (repeatable)
    #[arg(long = "requirement", value_name = "TEXT")]
    pub requirements: Vec<String>,

    /// File with one requirement per line
    #[arg(long)]
    pub requirements_file: Option<PathBuf>,

    /// Code unit path, resolved through the configured code store (repeatable)
    #[arg(long, value_name = "PATH")]
    pub code: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct RedactArgs {
    /// Text to redact (reads stdin when omitted)
    pub text: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ScanArgs {
    /// File to check
    pub path: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct ExtractArgs {
    /// Code unit path, resolved through the configured code store
    pub path: String,
}

#[derive(Clone, Debug, Args)]
pub struct CoverageArgs {
    /// Dataset name (defaults to metrics.dataset)
    #[arg(long)]
    pub dataset: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct DryRunArgs {
    /// Write artifacts here instead of a temporary directory
    #[arg(long)]
    pub workdir: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name, e.g. requirement, generated-test, run-summary
    pub type_name: String,
}
