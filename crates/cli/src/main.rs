//! repograph command line
//!
//! ```text
//! repograph ingest [--root DIR] [--uri URI] [--dry-run [--export graph.json]]
//! repograph extract <FILE>
//! ```
//!
//! Logs go to stderr, results to stdout.

use anyhow::Result;
use clap::Parser;

mod cli;
mod command;
mod config;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .target(env_logger::Target::Stderr)
        .init();

    match cli.command {
        Command::Ingest(args) => command::run_ingest(args, cli.config.as_deref()).await,
        Command::Extract(args) => command::run_extract(args).await,
    }
}
