//! Conversations about a single document.

use docflow_core::{Document, DocumentId, Error, ErrorKind, MessageId, Result};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    AnswerRequest, AssistantService, ChatRole, ChatTurn, DocumentPayload, SummarizeRequest,
    TRACING_TARGET,
};

/// One message of a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier.
    pub id: MessageId,
    /// Who wrote the message.
    pub role: ChatRole,
    /// Message text.
    pub text: String,
    /// When the message was added.
    pub timestamp: Timestamp,
}

impl ChatMessage {
    fn new(role: ChatRole, text: String) -> Self {
        Self {
            id: MessageId::new(),
            role,
            text,
            timestamp: Timestamp::now(),
        }
    }
}

impl From<&ChatMessage> for ChatTurn {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            text: message.text.clone(),
        }
    }
}

/// Ordered transcript of a conversation about one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    document_id: DocumentId,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Starts an empty conversation about `document_id`.
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            messages: Vec::new(),
        }
    }

    /// Document the conversation is about.
    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    /// Messages, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Asks a question and appends the reply.
    ///
    /// Blank questions and documents without content never reach the
    /// provider. When the provider fails, the question stays in the
    /// transcript without a reply and the error is returned.
    pub async fn ask(
        &mut self,
        service: &AssistantService,
        document: &Document,
        question: &str,
    ) -> Result<&ChatMessage> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::invalid_input().with_message("question must not be empty"));
        }
        if document.id != self.document_id {
            return Err(Error::invalid_input().with_message(format!(
                "session belongs to document {}, not {}",
                self.document_id, document.id
            )));
        }
        let payload = DocumentPayload::from_document(document)?;

        let history: Vec<ChatTurn> = self.messages.iter().map(ChatTurn::from).collect();
        self.messages
            .push(ChatMessage::new(ChatRole::User, question.to_owned()));

        let request = AnswerRequest::new(payload, question).with_history(history);
        let answer = service.answer(&request).await?;

        self.messages.push(ChatMessage::new(ChatRole::Model, answer));
        Ok(&self.messages[self.messages.len() - 1])
    }
}

/// Returns the summary of a document, generating it when missing.
///
/// Yields `None` when the document has no content or the summary could not
/// be generated; failures are logged, never propagated.
pub async fn ensure_summary(service: &AssistantService, document: &Document) -> Option<String> {
    if let Some(summary) = &document.summary {
        return Some(summary.clone());
    }

    let payload = DocumentPayload::from_document(document).ok()?;
    match service
        .summarize(document.id, &SummarizeRequest::new(payload))
        .await
    {
        Ok(summary) => Some(summary),
        Err(error) if error.kind() == ErrorKind::Conflict => {
            tracing::warn!(
                target: TRACING_TARGET,
                document_id = %document.id,
                "Summary already being generated"
            );
            None
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET,
                document_id = %document.id,
                error = %error,
                "No summary available"
            );
            None
        }
    }
}
