#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;
mod seed;
mod state;
mod telemetry;

use std::io::{self, Write};
use std::process;

use anyhow::Context;

use crate::command::Outcome;
use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "docflow_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "docflow_cli::config";
pub const TRACING_TARGET_STATE: &str = "docflow_cli::state";
pub const TRACING_TARGET_COMMAND: &str = "docflow_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = %error,
            "command failed"
        );
    }
    eprintln!("Error: {error:#}");

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing(cli.log_format).context("failed to initialize tracing")?;
    cli.log();
    cli.validate().context("invalid configuration")?;

    let mut workspace = state::load_workspace(cli.state.as_deref())
        .context("failed to load workspace")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = command::execute(&cli, &mut workspace, &mut out).await?;

    if outcome == Outcome::Changed {
        let snapshot = workspace.snapshot();
        match (&cli.state, cli.write) {
            (Some(path), true) => {
                state::save_snapshot(path, &snapshot).context("failed to save workspace")?;
                writeln!(out, "Saved workspace to {}", path.display())?;
            }
            _ => {
                serde_json::to_writer_pretty(&mut out, &snapshot)
                    .context("failed to print workspace")?;
                writeln!(out)?;
            }
        }
    }

    Ok(())
}
