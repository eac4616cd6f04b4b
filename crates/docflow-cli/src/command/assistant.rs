//! `docflow assistant ...`

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use docflow_assistant::{AssistantService, ChatSession, ensure_summary};
use docflow_core::{Document, DocumentId};
use jiff::Timestamp;

use super::read_upload;

/// Assistant commands.
#[derive(Debug, Clone, Subcommand)]
pub enum AssistantCommand {
    /// Summarize a document
    Summarize {
        /// Document file
        path: PathBuf,

        /// MIME type; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
    },

    /// Ask a question about a document
    Ask {
        /// Document file
        path: PathBuf,

        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// MIME type; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
    },
}

pub(super) async fn run(
    command: &AssistantCommand,
    service: &AssistantService,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        AssistantCommand::Summarize { path, mime } => {
            let document = load_document(path, mime.as_deref())?;
            match ensure_summary(service, &document).await {
                Some(summary) => writeln!(out, "{summary}")?,
                None => writeln!(out, "No summary available.")?,
            }
        }
        AssistantCommand::Ask {
            path,
            question,
            mime,
        } => {
            let document = load_document(path, mime.as_deref())?;
            let mut session = ChatSession::new(document.id);
            let reply = session
                .ask(service, &document, &question.join(" "))
                .await
                .context("the assistant could not answer")?;
            writeln!(out, "{}", reply.text)?;
        }
    }

    Ok(())
}

fn load_document(path: &Path, mime: Option<&str>) -> anyhow::Result<Document> {
    let upload = read_upload(path, mime)?;
    Ok(upload.into_document(DocumentId::new(), Timestamp::now())?)
}
