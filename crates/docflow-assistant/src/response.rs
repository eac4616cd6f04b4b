//! Response types returned by assistant providers.

use serde::{Deserialize, Serialize};

/// Token accounting reported by the model.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt, document included.
    pub prompt_tokens: u32,
    /// Tokens in the reply.
    pub output_tokens: u32,
}

/// Raw reply of a provider.
///
/// `text` is `None` when the model produced nothing usable, for example
/// because the prompt was blocked.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantResponse {
    /// Generated text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Why generation stopped, as reported by the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// Token accounting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl AssistantResponse {
    /// Creates a response carrying `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Creates a response without usable text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the finish reason.
    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }

    /// Sets the token usage.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Returns the text, or `fallback` if it is missing or blank.
    pub fn text_or(self, fallback: &str) -> String {
        match self.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => fallback.to_owned(),
        }
    }
}
