use anyhow::Context;
use att_core::entities::EmployeeRecord;
use att_config::AttestConfig;
use att_pipeline::Evaluation;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::commands::PredictArgs;
use crate::output::output;

/// Handle `attest predict`.
pub async fn handle(
    args: PredictArgs,
    config: &AttestConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let pipeline = bootstrap::pipeline(config, flags, args.remote)?;
    pipeline
        .submit_employee(EmployeeRecord::from(args.employee))
        .context("invalid employee data")?;

    match pipeline.predict().await.context("prediction failed")? {
        Evaluation::Completed(verdict) => output(&verdict, flags.format),
        Evaluation::Cancelled => anyhow::bail!("prediction was cancelled"),
    }
}
