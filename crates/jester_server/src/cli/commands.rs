//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Jester - posts a meme about whatever is trending, degrading instead of failing
#[derive(Parser, Debug)]
#[command(name = "jester")]
#[command(about = "Trend-driven meme poster with graceful degradation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./jester.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the trigger routes over HTTP
    Serve {
        /// Listen address, overriding server.bind
        #[arg(long)]
        bind: Option<String>,
    },

    /// Execute one run and print the JSON report
    Run,

    /// Validate configuration and credentials without calling any API
    CheckConfig,
}
