//! Assistant provider selection.

use anyhow::Context;
use docflow_assistant::AssistantService;
use docflow_assistant::gemini::GeminiClient;
use docflow_assistant::mock::{MockConfig, MockProvider};

use super::Cli;
use crate::TRACING_TARGET_CONFIG;

/// Creates the assistant service from CLI configuration.
///
/// # Errors
///
/// Returns an error if the Gemini client cannot be initialized.
pub fn create_assistant_service(cli: &Cli) -> anyhow::Result<AssistantService> {
    if cli.mock {
        tracing::info!(target: TRACING_TARGET_CONFIG, "Using mock assistant");
        return Ok(AssistantService::new(MockProvider::new(MockConfig::default())));
    }

    let client = GeminiClient::new(cli.gemini.clone())
        .context("failed to create Gemini client (set GEMINI_API_KEY or pass --mock)")?;
    Ok(client.into_service())
}
