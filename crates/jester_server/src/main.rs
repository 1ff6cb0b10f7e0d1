//! Jester binary.
//!
//! - `serve`: HTTP trigger routes with optional bearer gate
//! - `run`: one run, JSON report on stdout, exit 1 unless published
//! - `check-config`: validate settings and credentials offline

use clap::Parser;
use jester_server::{JesterConfig, ObservabilityConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use cli::{Cli, Commands, check_config, run_once, serve};

    let cli = Cli::parse();
    // Secrets and JESTER_* overrides may live in .env.
    let _ = dotenvy::dotenv();

    let observability = ObservabilityConfig::default().with_json_logs(cli.json_logs);
    init_observability(&observability).map_err(|e| anyhow::anyhow!("{}", e))?;

    let config = JesterConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind } => serve(config, bind).await?,
        Commands::Run => run_once(config).await?,
        Commands::CheckConfig => check_config(config)?,
    }

    Ok(())
}
