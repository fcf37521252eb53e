use std::sync::Arc;

use anyhow::Context;
use att_chain::{JsonRpcGateway, ScriptedGateway, TransactionTracker, WalletGateway};
use att_config::AttestConfig;
use att_pipeline::Pipeline;
use att_rules::{HttpPredictor, LocalPredictor, Predictor, RuleEngine, RuleThresholds, SystemNoise};

use crate::cli::GlobalFlags;

/// Contract used by `--simulate` when none is configured.
const SIMULATED_CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

pub fn load_config() -> anyhow::Result<AttestConfig> {
    AttestConfig::load_with_dotenv().context("failed to load attest configuration")
}

pub fn predictor(config: &AttestConfig, remote: bool) -> anyhow::Result<Arc<dyn Predictor>> {
    if remote || config.prediction.remote {
        let predictor = HttpPredictor::new(&config.prediction.api_base_url)
            .context("failed to build prediction API client")?;
        tracing::debug!(endpoint = predictor.endpoint(), "using remote predictor");
        return Ok(Arc::new(predictor));
    }

    let thresholds =
        RuleThresholds::default().with_full_month_days(config.prediction.full_month_days);
    let engine = RuleEngine::new(thresholds, Arc::new(SystemNoise));
    Ok(Arc::new(LocalPredictor::new(engine, config.prediction_latency())))
}

pub fn tracker(config: &AttestConfig, flags: &GlobalFlags) -> anyhow::Result<TransactionTracker> {
    let mut contract = config.chain.contract_address();
    let gateway: Arc<dyn WalletGateway> = if flags.simulate {
        if contract.is_none() {
            tracing::info!(contract = SIMULATED_CONTRACT, "no contract configured; simulating one");
            contract = Some(SIMULATED_CONTRACT);
        }
        Arc::new(ScriptedGateway::new())
    } else {
        let rpc_url = &config.chain.rpc_url;
        Arc::new(
            JsonRpcGateway::new(rpc_url)
                .with_context(|| format!("failed to build JSON-RPC client for {rpc_url}"))?,
        )
    };
    Ok(TransactionTracker::new(gateway, contract))
}

pub fn pipeline(
    config: &AttestConfig,
    flags: &GlobalFlags,
    remote: bool,
) -> anyhow::Result<Pipeline> {
    Ok(
        Pipeline::new(predictor(config, remote)?, tracker(config, flags)?)
            .with_poll_interval(config.poll_interval()),
    )
}
