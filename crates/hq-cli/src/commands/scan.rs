use anyhow::Context;
use hq_redact::PhiCategory;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ScanArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ScanResponse {
    path: String,
    clean: bool,
    categories: Vec<PhiCategory>,
}

/// Handle `hqa scan`. Prints the findings, then fails if any were found.
pub fn handle(args: &ScanArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;

    let categories = hq_redact::find_phi(&text);
    output(
        &ScanResponse {
            path: args.path.display().to_string(),
            clean: categories.is_empty(),
            categories,
        },
        flags.format,
    )?;

    hq_redact::assert_clean(&text)
        .with_context(|| format!("{} failed the PHI guard", args.path.display()))
}
