//! Command-line driver for weighted round-robin record sets on Aliyun DNS
//!
//! Reads a record set definition (TOML), runs one lifecycle operation against
//! Alidns and prints the resulting state as JSON on stdout. Logs go to stderr,
//! so stdout can be redirected into a state file and fed back with `--state`.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use alidns_wrr_core::CoreError;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries the JSON output
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.global.log_level));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(filter)
        .init();

    match execute(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if e.downcast_ref::<CoreError>().is_some_and(CoreError::is_expected) {
                tracing::warn!("{e:#}");
            } else {
                tracing::error!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<String> {
    let api = if cli.command.needs_client() {
        Some(commands::build_client(&cli.global)?)
    } else {
        None
    };
    let output = commands::run(cli.command, api).await?;
    Ok(serde_json::to_string_pretty(&output)?)
}
