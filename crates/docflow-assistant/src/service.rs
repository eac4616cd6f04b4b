//! Assistant service wrapper with observability.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use docflow_core::{DocumentId, Error, Result};

use crate::prompt::{ANSWER_FALLBACK, SUMMARY_FALLBACK};
use crate::{AnswerRequest, AssistantProvider, ServiceHealth, SummarizeRequest, TRACING_TARGET};

type InFlight = Arc<Mutex<HashSet<DocumentId>>>;

/// Assistant service wrapper.
///
/// Adds structured logging and fallback texts to any provider, and admits at
/// most one summarize call per document at a time. The inner provider is
/// wrapped in `Arc` for cheap cloning; clones share the in-flight set.
#[derive(Clone)]
pub struct AssistantService {
    inner: Arc<dyn AssistantProvider>,
    in_flight: InFlight,
}

impl fmt::Debug for AssistantService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantService").finish_non_exhaustive()
    }
}

/// Releases a document's summarize slot when dropped.
struct SummarizeSlot {
    in_flight: InFlight,
    document_id: DocumentId,
}

impl SummarizeSlot {
    fn acquire(in_flight: &InFlight, document_id: DocumentId) -> Result<Self> {
        let mut set = in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(document_id) {
            return Err(Error::conflict().with_message(format!(
                "a summary of document {document_id} is already being generated"
            )));
        }

        Ok(Self {
            in_flight: Arc::clone(in_flight),
            document_id,
        })
    }
}

impl Drop for SummarizeSlot {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.document_id);
    }
}

impl AssistantService {
    /// Creates a new service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: AssistantProvider + 'static,
    {
        Self::from_arc(Arc::new(provider))
    }

    /// Creates a service from a shared provider.
    pub fn from_arc(provider: Arc<dyn AssistantProvider>) -> Self {
        Self {
            inner: provider,
            in_flight: Arc::default(),
        }
    }

    /// Returns whether a summary of `document_id` is being generated.
    pub fn is_summarizing(&self, document_id: DocumentId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&document_id)
    }

    /// Summarizes a document.
    ///
    /// A second call for the same document while one is pending fails with
    /// `Conflict` without reaching the provider.
    pub async fn summarize(
        &self,
        document_id: DocumentId,
        request: &SummarizeRequest,
    ) -> Result<String> {
        let _slot = SummarizeSlot::acquire(&self.in_flight, document_id)?;
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            document_id = %document_id,
            mime_type = %request.document.mime_type,
            size = request.document.content.len(),
            "Summarizing document"
        );

        match self.inner.summarize(request).await {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    document_id = %document_id,
                    finish_reason = ?response.finish_reason,
                    usage = ?response.usage,
                    elapsed_ms = started_at.elapsed().as_millis(),
                    "Summary generated"
                );
                Ok(response.text_or(SUMMARY_FALLBACK))
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    document_id = %document_id,
                    error = %error,
                    elapsed_ms = started_at.elapsed().as_millis(),
                    "Summary failed"
                );
                Err(error)
            }
        }
    }

    /// Answers a question about a document.
    pub async fn answer(&self, request: &AnswerRequest) -> Result<String> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            history = request.history.len(),
            mime_type = %request.document.mime_type,
            "Answering question"
        );

        match self.inner.answer(request).await {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    finish_reason = ?response.finish_reason,
                    usage = ?response.usage,
                    elapsed_ms = started_at.elapsed().as_millis(),
                    "Answer generated"
                );
                Ok(response.text_or(ANSWER_FALLBACK))
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    elapsed_ms = started_at.elapsed().as_millis(),
                    "Answer failed"
                );
                Err(error)
            }
        }
    }

    /// Checks the provider.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use docflow_core::ErrorKind;

    use super::*;
    use crate::mock::{MockConfig, MockProvider};
    use crate::{AssistantResponse, DocumentPayload};

    fn request() -> SummarizeRequest {
        SummarizeRequest::new(DocumentPayload::new("application/pdf", b"%PDF".to_vec()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_summarize_is_rejected() {
        let provider = MockProvider::new(MockConfig::default().with_latency(Duration::from_secs(5)));
        let service = AssistantService::new(provider.clone());
        let document = DocumentId::new();

        let first = {
            let service = service.clone();
            tokio::spawn(async move {
                let request = request();
                service.summarize(document, &request).await
            })
        };
        tokio::task::yield_now().await;
        assert!(service.is_summarizing(document));

        let err = service.summarize(document, &request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let summary = first.await.unwrap().unwrap();
        assert_eq!(summary, provider.config().summary);
        assert!(!service.is_summarizing(document));
        assert_eq!(provider.summarize_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_documents_run_concurrently() {
        let provider = MockProvider::new(MockConfig::default().with_latency(Duration::from_secs(1)));
        let service = AssistantService::new(provider.clone());

        let (first, second) = (request(), request());
        let (a, b) = tokio::join!(
            service.summarize(DocumentId::new(), &first),
            service.summarize(DocumentId::new(), &second),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(provider.summarize_calls(), 2);
    }

    #[tokio::test]
    async fn test_slot_released_after_failure() {
        let provider = MockProvider::new(MockConfig::default().with_failure(ErrorKind::RateLimited));
        let service = AssistantService::new(provider);
        let document = DocumentId::new();

        let err = service.summarize(document, &request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert!(!service.is_summarizing(document));
    }

    #[tokio::test]
    async fn test_empty_replies_use_fallbacks() {
        let provider = MockProvider::new(
            MockConfig::default().with_response(AssistantResponse::empty()),
        );
        let service = AssistantService::new(provider);

        let summary = service.summarize(DocumentId::new(), &request()).await.unwrap();
        assert_eq!(summary, SUMMARY_FALLBACK);

        let answer = service
            .answer(&AnswerRequest::new(request().document, "Who signs?"))
            .await
            .unwrap();
        assert_eq!(answer, ANSWER_FALLBACK);
    }
}
