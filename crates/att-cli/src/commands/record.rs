use anyhow::Context;
use att_config::AttestConfig;
use att_core::entities::{ComplianceVerdict, EmployeeRecord, TransactionRecord};
use att_pipeline::Evaluation;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::commands::RecordArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordResponse {
    transaction: TransactionRecord,
    explorer_url: String,
    verdict: ComplianceVerdict,
}

/// Handle `attest record`: evaluate the employee, then submit the verdict.
pub async fn handle(
    args: RecordArgs,
    config: &AttestConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let pipeline = bootstrap::pipeline(config, flags, args.remote)?;
    pipeline
        .submit_employee(EmployeeRecord::from(args.employee))
        .context("invalid employee data")?;

    let verdict = match pipeline.predict().await.context("prediction failed")? {
        Evaluation::Completed(verdict) => verdict,
        Evaluation::Cancelled => anyhow::bail!("prediction was cancelled"),
    };

    let mut transaction = pipeline
        .submit_transaction()
        .await
        .context("failed to record verdict on-chain")?;

    if args.wait {
        if !flags.quiet {
            eprintln!("Waiting for {} to be mined...", transaction.hash);
        }
        transaction = pipeline
            .settled_transaction()
            .await
            .context("transaction tracking stopped before a receipt arrived")?;
    }

    let response = RecordResponse {
        explorer_url: config.chain.explorer_tx_url(&transaction.hash),
        transaction,
        verdict,
    };
    output(&response, flags.format)
}
