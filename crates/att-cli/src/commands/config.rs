use att_config::AttestConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

const NOT_CONFIGURED: &str = "Not configured";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigView<'a> {
    contract_address: &'a str,
    network: &'a str,
    rpc_url: &'a str,
    explorer_url: &'a str,
    poll_interval_secs: u64,
    prediction_api: &'a str,
    remote_prediction: bool,
    full_month_days: u32,
}

impl<'a> From<&'a AttestConfig> for ConfigView<'a> {
    fn from(config: &'a AttestConfig) -> Self {
        Self {
            contract_address: config.chain.contract_address().unwrap_or(NOT_CONFIGURED),
            network: &config.chain.network,
            rpc_url: &config.chain.rpc_url,
            explorer_url: &config.chain.explorer_url,
            poll_interval_secs: config.chain.poll_interval_secs,
            prediction_api: &config.prediction.api_base_url,
            remote_prediction: config.prediction.remote,
            full_month_days: config.prediction.full_month_days,
        }
    }
}

/// Handle `attest config`: show the effective configuration.
pub fn handle(config: &AttestConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ConfigView::from(config), flags.format)
}
