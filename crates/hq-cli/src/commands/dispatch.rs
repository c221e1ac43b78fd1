use hq_config::HqConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &HqConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => commands::run::handle(&args, config, flags).await,
        Commands::Extract(args) => commands::extract::handle(&args, config, flags).await,
        Commands::Coverage(args) => commands::coverage::handle(&args, config, flags).await,
        Commands::Redact(_) | Commands::Scan(_) | Commands::DryRun(_) | Commands::Schema(_) => {
            unreachable!("redact/scan/dry-run/schema are pre-dispatched in main")
        }
    }
}
