//! Command-line interface for the jester binary.

mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{check_config, run_once, serve};
