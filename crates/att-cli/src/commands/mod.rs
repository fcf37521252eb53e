pub mod config;
pub mod predict;
pub mod record;
pub mod schema;
pub mod status;

use att_config::AttestConfig;

use crate::cli::{Commands, GlobalFlags};

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &AttestConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Predict(args) => predict::handle(args, config, flags).await,
        Commands::Record(args) => record::handle(args, config, flags).await,
        Commands::Status(args) => status::handle(&args, config, flags).await,
        Commands::Config => config::handle(config, flags),
        Commands::Schema(args) => schema::handle(&args, flags),
    }
}
