//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── state / write / mock / log_format  # global options
//! ├── gemini: GeminiConfig               # Gemini API access
//! └── command: Command                   # what to do
//! ```
//!
//! All options can be provided via CLI arguments or environment variables.
//!
//! # Example
//!
//! ```bash
//! docflow --state workspace.json documents list --tag Finance
//! DOCFLOW_STATE=workspace.json docflow workflows list
//! ```

mod provider;

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use docflow_assistant::gemini::GeminiConfig;
pub use provider::create_assistant_service;
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Log output format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "docflow")]
#[command(about = "Document manager with workflows and an AI assistant")]
#[command(version)]
pub struct Cli {
    /// Workspace snapshot (JSON); the demo workspace is used when omitted
    #[arg(long, env = "DOCFLOW_STATE", global = true)]
    pub state: Option<PathBuf>,

    /// Write changes back to the snapshot instead of printing it
    #[arg(long, global = true)]
    pub write: bool,

    /// Use the offline mock assistant instead of Gemini
    #[arg(long, env = "DOCFLOW_MOCK", global = true)]
    pub mock: bool,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Gemini configuration.
    #[clap(flatten)]
    pub gemini: GeminiConfig,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates option combinations.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.write && self.state.is_none() {
            anyhow::bail!("--write requires --state");
        }
        Ok(())
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            state = ?self.state,
            write = self.write,
            mock = self.mock,
            model = %self.gemini.model,
            has_api_key = self.gemini.api_key.is_some(),
            http_timeout = self.gemini.http_timeout,
            response_language = %self.gemini.response_language,
            "Configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
