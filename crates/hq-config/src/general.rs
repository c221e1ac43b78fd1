//! General run configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_output_dir() -> String {
    String::from("tests/generated")
}

fn default_traceability_path() -> String {
    String::from("traceability.csv")
}

const fn default_io_timeout_secs() -> u64 {
    15
}

const fn default_title_max_chars() -> usize {
    80
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Directory generated test files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Traceability CSV location. Overwritten on every run.
    #[serde(default = "default_traceability_path")]
    pub traceability_path: String,

    /// Upper bound for every network or process call, in seconds.
    #[serde(default = "default_io_timeout_secs")]
    pub io_timeout_secs: u64,

    /// Requirement titles longer than this many characters are truncated.
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            traceability_path: default_traceability_path(),
            io_timeout_secs: default_io_timeout_secs(),
            title_max_chars: default_title_max_chars(),
        }
    }
}

impl GeneralConfig {
    #[must_use]
    pub const fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_secs)
    }
}
