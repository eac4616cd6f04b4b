//! Request types sent to assistant providers.

use docflow_core::{Document, DocumentContent, Error, Result};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Document bytes together with their MIME type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    /// MIME type of `content`.
    pub mime_type: String,
    /// Raw document bytes, base64 on the wire.
    pub content: DocumentContent,
}

impl DocumentPayload {
    /// Creates a payload.
    pub fn new(mime_type: impl Into<String>, content: impl Into<DocumentContent>) -> Self {
        Self {
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    /// Extracts the payload of a document.
    ///
    /// Fails with `InvalidInput` when the document has no content to analyze.
    pub fn from_document(document: &Document) -> Result<Self> {
        match &document.content {
            Some(content) if !content.is_empty() => {
                Ok(Self::new(document.mime_type.clone(), content.clone()))
            }
            _ => Err(Error::invalid_input()
                .with_message(format!("document '{}' has no content", document.name))),
        }
    }
}

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    /// The person asking questions.
    User,
    /// The assistant.
    Model,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who wrote the turn.
    pub role: ChatRole,
    /// Text of the turn.
    pub text: String,
}

impl ChatTurn {
    /// Creates a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    /// Creates a model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Request to summarize a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    /// Document to summarize.
    pub document: DocumentPayload,
}

impl SummarizeRequest {
    /// Creates a summarize request.
    pub fn new(document: DocumentPayload) -> Self {
        Self { document }
    }
}

/// Request to answer a question about a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRequest {
    /// Document the question is about.
    pub document: DocumentPayload,
    /// Earlier turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    /// The new question.
    pub question: String,
}

impl AnswerRequest {
    /// Creates a request without history.
    pub fn new(document: DocumentPayload, question: impl Into<String>) -> Self {
        Self {
            document,
            history: Vec::new(),
            question: question.into(),
        }
    }

    /// Sets the prior conversation.
    pub fn with_history(mut self, history: impl IntoIterator<Item = ChatTurn>) -> Self {
        self.history = history.into_iter().collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use docflow_core::ErrorKind;

    use super::*;

    #[test]
    fn test_payload_from_document() {
        let document = Document::builder()
            .with_name("scan.pdf")
            .with_content(DocumentContent::new(b"%PDF".to_vec()))
            .build()
            .unwrap();
        let payload = DocumentPayload::from_document(&document).unwrap();
        assert_eq!(payload.mime_type, "application/pdf");
        assert_eq!(payload.content.len(), 4);
    }

    #[test]
    fn test_payload_requires_content() {
        let document = Document::builder().with_name("listed.pdf").build().unwrap();
        let err = DocumentPayload::from_document(&document).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let turn = ChatTurn::model("Hello");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "model");
        assert!(serde_json::from_str::<ChatRole>("\"assistant\"").is_err());
    }
}
