//! Validator configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorMode {
    /// Mark every test passed and report a fixed coverage estimate.
    #[default]
    Simulate,
    /// Run each test file with an external runner.
    Process,
}

const fn default_simulated_coverage() -> f64 {
    0.82
}

fn default_runner() -> String {
    String::from("pytest")
}

fn default_runner_args() -> Vec<String> {
    vec![String::from("-q")]
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub mode: ValidatorMode,

    /// Coverage reported by the simulator, in `[0.0, 1.0]`.
    #[serde(default = "default_simulated_coverage")]
    pub simulated_coverage: f64,

    /// Test runner executable for `process` mode.
    #[serde(default = "default_runner")]
    pub runner: String,

    #[serde(default = "default_runner_args")]
    pub runner_args: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            mode: ValidatorMode::default(),
            simulated_coverage: default_simulated_coverage(),
            runner: default_runner(),
            runner_args: default_runner_args(),
        }
    }
}
