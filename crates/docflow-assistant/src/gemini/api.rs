//! Wire types of the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

use crate::prompt::{answer_instruction, question_prompt, summary_prompt};
use crate::{AnswerRequest, AssistantResponse, ChatRole, DocumentPayload, SummarizeRequest, TokenUsage};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(super) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) enum Part {
    Text(String),
    InlineData(InlineData),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl Content {
    fn new(role: ChatRole, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts,
        }
    }

    fn instruction(text: String) -> Self {
        Self {
            role: None,
            parts: vec![Part::Text(text)],
        }
    }
}

impl From<&DocumentPayload> for Part {
    fn from(payload: &DocumentPayload) -> Self {
        Self::InlineData(InlineData {
            mime_type: payload.mime_type.clone(),
            data: payload.content.to_base64(),
        })
    }
}

impl GenerateContentRequest {
    /// One user turn: the document followed by the summary instruction.
    pub fn summarize(request: &SummarizeRequest, language: &str) -> Self {
        let parts = vec![
            Part::from(&request.document),
            Part::Text(summary_prompt(language)),
        ];

        Self {
            contents: vec![Content::new(ChatRole::User, parts)],
            system_instruction: None,
        }
    }

    /// The history as role-tagged turns plus the new question, with the
    /// document attached to the first user turn.
    pub fn answer(request: &AnswerRequest, language: &str) -> Self {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|turn| Content::new(turn.role, vec![Part::Text(turn.text.clone())]))
            .collect();
        contents.push(Content::new(
            ChatRole::User,
            vec![Part::Text(question_prompt(&request.question))],
        ));

        let user = ChatRole::User.to_string();
        if let Some(first) = contents
            .iter_mut()
            .find(|c| c.role.as_deref() == Some(user.as_str()))
        {
            first.parts.insert(0, Part::from(&request.document));
        }

        Self {
            contents,
            system_instruction: Some(Content::instruction(answer_instruction(language))),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(super) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

/// Parts carry other fields (thought signatures, function calls) that are
/// ignored here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(super) struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl From<GenerateContentResponse> for AssistantResponse {
    fn from(response: GenerateContentResponse) -> Self {
        let usage = response.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        });

        let Some(candidate) = response.candidates.into_iter().next() else {
            return Self {
                text: None,
                finish_reason: response.prompt_feedback.and_then(|f| f.block_reason),
                usage,
            };
        };

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text)
            .collect();

        Self {
            text: (!text.is_empty()).then_some(text),
            finish_reason: candidate.finish_reason,
            usage,
        }
    }
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(super) struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(super) struct ErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ChatTurn;

    fn payload() -> DocumentPayload {
        DocumentPayload::new("application/pdf", b"%PDF".to_vec())
    }

    #[test]
    fn test_summarize_request_body() {
        let body = GenerateContentRequest::summarize(&SummarizeRequest::new(payload()), "English");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][0]["inlineData"],
            json!({ "mimeType": "application/pdf", "data": "JVBERg==" })
        );
        assert!(json["contents"][0]["parts"][1]["text"]
            .as_str()
            .unwrap()
            .contains("English"));
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn test_answer_request_keeps_roles() {
        let request = AnswerRequest::new(payload(), "When does it expire?").with_history([
            ChatTurn::user("Who signs?"),
            ChatTurn::model("The supplier."),
        ]);
        let body = GenerateContentRequest::answer(&request, "Italian");
        let json = serde_json::to_value(&body).unwrap();

        let roles: Vec<_> = json["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(roles, ["user", "model", "user"]);

        assert!(json["contents"][0]["parts"][0].get("inlineData").is_some());
        assert_eq!(json["contents"][0]["parts"][1]["text"], "Who signs?");
        assert_eq!(
            json["contents"][2]["parts"][0]["text"],
            "Question: When does it expire?"
        );
        assert_eq!(json["contents"][2]["parts"].as_array().unwrap().len(), 1);
        assert!(json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Italian"));
    }

    #[test]
    fn test_answer_without_history_attaches_document_to_question() {
        let body = GenerateContentRequest::answer(&AnswerRequest::new(payload(), "Total?"), "English");
        assert_eq!(body.contents.len(), 1);
        assert_eq!(body.contents[0].parts.len(), 2);
        assert!(matches!(body.contents[0].parts[0], Part::InlineData(_)));
    }

    #[test]
    fn test_parse_response() {
        let raw = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Key points: " }, { "text": "payment in 30 days." }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 1200, "candidatesTokenCount": 80, "totalTokenCount": 1280 }
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let response = AssistantResponse::from(response);

        assert_eq!(response.text.as_deref(), Some("Key points: payment in 30 days."));
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage.unwrap().prompt_tokens, 1200);
    }

    #[test]
    fn test_parse_skips_thoughts() {
        let raw = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "Answer.", "thoughtSignature": "abc" }
                ] }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(AssistantResponse::from(response).text.as_deref(), Some("Answer."));
    }

    #[test]
    fn test_parse_blocked_response() {
        let raw = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let response = AssistantResponse::from(response);

        assert!(response.text.is_none());
        assert_eq!(response.finish_reason.as_deref(), Some("SAFETY"));
    }

    #[test]
    fn test_parse_error_body() {
        let raw = json!({ "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" } });
        let body: ErrorResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(body.error.message, "Quota exceeded");
    }
}
