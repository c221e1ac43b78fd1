use hq_config::{HqConfig, MetricsConfig, ModelConfig, StorageConfig};

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &HqConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &HqConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.tracker.is_configured() && has_single_underscore_key(&env_keys, "HQA_TRACKER") {
        warnings.push(
            "Tracker config is unusable while HQA_TRACKER_* env vars exist. Use double underscores (example: HQA_TRACKER__JIRA__API_TOKEN)."
                .to_string(),
        );
    }

    if config.storage == StorageConfig::default()
        && has_single_underscore_key(&env_keys, "HQA_STORAGE")
    {
        warnings.push(
            "Storage config appears default while HQA_STORAGE_* env vars exist. Use double underscores (example: HQA_STORAGE__BUCKET)."
                .to_string(),
        );
    }

    if config.model == ModelConfig::default() && has_single_underscore_key(&env_keys, "HQA_MODEL") {
        warnings.push(
            "Model config appears default while HQA_MODEL_* env vars exist. Use double underscores (example: HQA_MODEL__ENDPOINT)."
                .to_string(),
        );
    }

    if config.metrics == MetricsConfig::default()
        && has_single_underscore_key(&env_keys, "HQA_METRICS")
    {
        warnings.push(
            "Metrics config appears default while HQA_METRICS_* env vars exist. Use double underscores (example: HQA_METRICS__BACKEND)."
                .to_string(),
        );
    }

    warnings
}

/// `HQA_TRACKER_PROVIDER` matches, `HQA_TRACKER__PROVIDER` does not.
fn has_single_underscore_key(keys: &[String], section: &str) -> bool {
    let nested = format!("{section}__");
    let single = format!("{section}_");
    keys.iter()
        .any(|key| key.starts_with(&single) && !key.starts_with(&nested))
}
