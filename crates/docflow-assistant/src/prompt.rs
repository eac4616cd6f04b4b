//! Prompt texts.

/// Reply used when the model returns no summary.
pub const SUMMARY_FALLBACK: &str = "Unable to generate a summary.";

/// Reply used when the model returns no answer.
pub const ANSWER_FALLBACK: &str = "No answer was found in the document.";

/// Language the prompts ask for unless configured otherwise.
pub const DEFAULT_RESPONSE_LANGUAGE: &str = "English";

/// Instruction sent alongside a document to summarize.
pub fn summary_prompt(language: &str) -> String {
    format!(
        "Analyze this document. Write a structured summary in {language} that highlights \
         the key points, the purpose of the document and any actions it requires."
    )
}

/// System instruction for document chat.
pub fn answer_instruction(language: &str) -> String {
    format!(
        "You answer questions about the attached document. Base every answer \
         EXCLUSIVELY on the document and reply in {language}."
    )
}

/// Text of the turn carrying a new question.
pub fn question_prompt(question: &str) -> String {
    format!("Question: {question}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_mention_language() {
        assert!(summary_prompt("Italian").contains("Italian"));
        assert!(answer_instruction("German").contains("German"));
        assert_eq!(question_prompt("Who signs?"), "Question: Who signs?");
    }
}
