use anyhow::bail;
use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `hqa` binary.
#[derive(Debug, Parser)]
#[command(
    name = "hqa",
    version,
    about = "healthqa - requirement-to-test generation behind a PHI redaction gate"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project config directory (defaults to .healthqa)
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Override a config value, e.g. `--set tracker.provider=fixture`
    #[arg(long = "set", global = true, value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    ///
    /// # Errors
    ///
    /// Fails when a `--set` value is not `KEY=VALUE`.
    pub fn global_flags(&self) -> anyhow::Result<GlobalFlags> {
        let overrides = self
            .set
            .iter()
            .map(|pair| parse_override(pair))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            config_dir: self.config_dir.clone(),
            overrides,
        })
    }
}

/// `tracker.jira.email=a@b` -> `("HQA_TRACKER__JIRA__EMAIL", "a@b")`.
fn parse_override(pair: &str) -> anyhow::Result<(String, String)> {
    let Some((key, value)) = pair.split_once('=') else {
        bail!("invalid --set '{pair}': expected KEY=VALUE");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("invalid --set '{pair}': empty key");
    }
    let env_key = format!(
        "{}{}",
        hq_config::ENV_PREFIX,
        key.replace('.', "__").to_ascii_uppercase()
    );
    Ok((env_key, value.to_string()))
}
