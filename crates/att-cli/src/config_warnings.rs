use att_config::AttestConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &AttestConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &AttestConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let defaults = AttestConfig::default();

    let mut warnings = Vec::new();

    if !config.chain.is_configured() && has_single_underscore_key(&env_keys, "ATTEST_CHAIN") {
        warnings.push(
            "Chain config appears default while ATTEST_CHAIN_* env vars exist. Use double underscores (example: ATTEST_CHAIN__CONTRACT_ADDRESS)."
                .to_string(),
        );
    }

    let prediction = &config.prediction;
    let prediction_is_default = prediction.api_base_url == defaults.prediction.api_base_url
        && prediction.remote == defaults.prediction.remote
        && prediction.latency_ms == defaults.prediction.latency_ms
        && prediction.full_month_days == defaults.prediction.full_month_days;
    if prediction_is_default && has_single_underscore_key(&env_keys, "ATTEST_PREDICTION") {
        warnings.push(
            "Prediction config appears default while ATTEST_PREDICTION_* env vars exist. Use double underscores (example: ATTEST_PREDICTION__API_BASE_URL)."
                .to_string(),
        );
    }

    warnings
}

/// `ATTEST_CHAIN_CONTRACT_ADDRESS` style keys, which figment reads as a
/// top-level `chain_contract_address` and ignores.
fn has_single_underscore_key(keys: &[String], section: &str) -> bool {
    let single = format!("{section}_");
    let double = format!("{section}__");
    keys.iter()
        .any(|key| key.starts_with(&single) && !key.starts_with(&double))
}
