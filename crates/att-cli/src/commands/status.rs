use att_config::AttestConfig;
use att_core::entities::TransactionRecord;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::commands::StatusArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    #[serde(flatten)]
    transaction: TransactionRecord,
    explorer_url: String,
}

/// Handle `attest status`.
pub async fn handle(
    args: &StatusArgs,
    config: &AttestConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let tracker = bootstrap::tracker(config, flags)?;
    let transaction = tracker.poll_status(&args.hash).await;
    let response = StatusResponse {
        explorer_url: config.chain.explorer_tx_url(&transaction.hash),
        transaction,
    };
    output(&response, flags.format)
}
