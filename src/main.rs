//! maskbind binary entry point.

use clap::Parser;
use maskbind::cli::{bind_cmd, doctor, format_cmd, probe_cmd, Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Bind(args) => bind_cmd::run(args, cli.json).await,
        Commands::Format { value } => {
            format_cmd::run_format(value);
            Ok(())
        }
        Commands::Strip { value } => {
            format_cmd::run_strip(value);
            Ok(())
        }
        Commands::Probe => probe_cmd::run(cli.json).await,
        Commands::Doctor => doctor::run(cli.json).await,
    }
}
