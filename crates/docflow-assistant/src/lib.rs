#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod health;
mod service;
mod session;

pub mod mock;
pub mod prompt;
pub mod request;
pub mod response;

#[cfg(feature = "gemini")]
#[cfg_attr(docsrs, doc(cfg(feature = "gemini")))]
pub mod gemini;

pub use docflow_core::{Error, ErrorKind, Result};
pub use health::{ServiceHealth, ServiceStatus};
pub use request::{AnswerRequest, ChatRole, ChatTurn, DocumentPayload, SummarizeRequest};
pub use response::{AssistantResponse, TokenUsage};
pub use service::AssistantService;
pub use session::{ChatMessage, ChatSession, ensure_summary};

/// Remote summarize/chat failures; the shared error with a remote kind.
pub type AssistantError = Error;

/// Tracing target for assistant operations.
pub const TRACING_TARGET: &str = "docflow_assistant";

/// Core trait for document assistant backends.
///
/// Every call is self-contained: the document payload travels with each
/// request and no state is kept between calls.
#[async_trait::async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Produces a summary of a document.
    async fn summarize(&self, request: &SummarizeRequest) -> Result<AssistantResponse>;

    /// Answers a question about a document given the prior conversation.
    async fn answer(&self, request: &AnswerRequest) -> Result<AssistantResponse>;

    /// Performs a health check on the provider.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
