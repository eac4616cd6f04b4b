//! Mock assistant provider for tests and offline use.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use docflow_core::{Error, ErrorKind, Result};
use serde::{Deserialize, Serialize};

use crate::{AnswerRequest, AssistantProvider, AssistantResponse, ServiceHealth, SummarizeRequest};

/// Configuration for the mock provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Text returned by `summarize`.
    pub summary: String,
    /// Text returned by `answer`.
    pub answer: String,
    /// Response returned by both calls instead of the texts above.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AssistantResponse>,
    /// Makes every call fail with this kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    /// Artificial delay before each reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<Duration>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            summary: "Mock summary of the document.".to_owned(),
            answer: "Mock answer based on the document.".to_owned(),
            response: None,
            failure: None,
            latency: None,
        }
    }
}

impl MockConfig {
    /// Sets the summary text.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Sets the answer text.
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = answer.into();
        self
    }

    /// Returns `response` from every call.
    pub fn with_response(mut self, response: AssistantResponse) -> Self {
        self.response = Some(response);
        self
    }

    /// Makes every call fail with `kind`.
    pub fn with_failure(mut self, kind: ErrorKind) -> Self {
        self.failure = Some(kind.to_string());
        self
    }

    /// Delays every reply.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

#[derive(Debug, Default)]
struct Calls {
    summarize: AtomicUsize,
    answer: AtomicUsize,
    last_answer: Mutex<Option<AnswerRequest>>,
}

/// Mock assistant provider.
///
/// Clones share their call counters.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    config: MockConfig,
    calls: Arc<Calls>,
}

impl MockProvider {
    /// Creates a mock provider with the given configuration.
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            calls: Arc::default(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Number of `summarize` calls so far.
    pub fn summarize_calls(&self) -> usize {
        self.calls.summarize.load(Ordering::SeqCst)
    }

    /// Number of `answer` calls so far.
    pub fn answer_calls(&self) -> usize {
        self.calls.answer.load(Ordering::SeqCst)
    }

    /// The most recent answer request.
    pub fn last_answer_request(&self) -> Option<AnswerRequest> {
        self.calls
            .last_answer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn reply(&self, text: &str) -> Result<AssistantResponse> {
        if let Some(latency) = self.config.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(kind) = &self.config.failure {
            let kind = kind.parse().unwrap_or(ErrorKind::ExternalError);
            return Err(Error::new(kind).with_message("mock provider failure"));
        }

        Ok(self
            .config
            .response
            .clone()
            .unwrap_or_else(|| AssistantResponse::text(text).with_finish_reason("STOP")))
    }
}

#[async_trait::async_trait]
impl AssistantProvider for MockProvider {
    async fn summarize(&self, _request: &SummarizeRequest) -> Result<AssistantResponse> {
        self.calls.summarize.fetch_add(1, Ordering::SeqCst);
        self.reply(&self.config.summary).await
    }

    async fn answer(&self, request: &AnswerRequest) -> Result<AssistantResponse> {
        self.calls.answer.fetch_add(1, Ordering::SeqCst);
        *self
            .calls
            .last_answer
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request.clone());
        self.reply(&self.config.answer).await
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(match &self.config.failure {
            Some(kind) => ServiceHealth::unhealthy(format!("configured to fail with {kind}")),
            None => ServiceHealth::healthy(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentPayload;

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let provider = MockProvider::default();
        let payload = DocumentPayload::new("application/pdf", b"%PDF".to_vec());

        let summary = provider
            .summarize(&SummarizeRequest::new(payload.clone()))
            .await
            .unwrap();
        assert_eq!(summary.text.as_deref(), Some(provider.config().summary.as_str()));

        provider
            .answer(&AnswerRequest::new(payload, "Who signs?"))
            .await
            .unwrap();
        assert_eq!(provider.summarize_calls(), 1);
        assert_eq!(provider.answer_calls(), 1);
        assert_eq!(
            provider.last_answer_request().unwrap().question,
            "Who signs?"
        );
    }

    #[tokio::test]
    async fn test_mock_failure_mode() {
        let provider = MockProvider::new(MockConfig::default().with_failure(ErrorKind::Timeout));
        let payload = DocumentPayload::new("application/pdf", b"%PDF".to_vec());

        let err = provider
            .summarize(&SummarizeRequest::new(payload))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(!provider.health_check().await.unwrap().is_healthy());
    }
}
