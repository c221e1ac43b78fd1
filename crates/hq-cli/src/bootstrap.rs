use std::path::{Path, PathBuf};

use anyhow::Context;
use hq_config::{HqConfig, PROJECT_CONFIG_DIR};

use crate::cli::GlobalFlags;

pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<HqConfig> {
    let config_dir = flags
        .config_dir
        .as_deref()
        .map_or_else(|| PathBuf::from(PROJECT_CONFIG_DIR), PathBuf::from);

    load_project_dotenv(&config_dir)?;

    HqConfig::load_from_dir(&config_dir, &flags.overrides)
        .with_context(|| format!("failed to load configuration from {}", config_dir.display()))
}

/// Prefer a `.env` next to the project config directory, then the usual
/// dotenv lookup from the current directory.
fn load_project_dotenv(config_dir: &Path) -> anyhow::Result<()> {
    if let Some(project_root) = config_dir.parent() {
        let env_path = project_root.join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
            return Ok(());
        }
    }

    dotenvy::dotenv().ok();
    Ok(())
}
