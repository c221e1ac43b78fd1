use anyhow::Context;
use hq_config::HqConfig;
use hq_pipeline::CodeUnit;
use hq_pipeline::code_store::code_store_from_config;
use hq_pipeline::extractor::SymbolExtractor;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExtractArgs;
use crate::output::output;

/// Handle `hqa extract`. Unlike a pipeline run, a load or parse failure is
/// reported as an error instead of an empty list.
pub async fn handle(
    args: &ExtractArgs,
    config: &HqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let timeout = config.general.io_timeout();
    let store = code_store_from_config(&config.storage, timeout)
        .context("code store is not usable")?;

    let symbols = SymbolExtractor::new(store.as_ref(), timeout)
        .extract_unit(&CodeUnit::Path(args.path.clone()))
        .await
        .with_context(|| format!("failed to extract symbols from {}", args.path))?;

    output(&symbols, flags.format)
}
