//! Subcommands.

mod assistant;
mod documents;
mod workflows;

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use clap::Subcommand;
use docflow_core::{UploadedFile, Workspace};

pub use self::assistant::AssistantCommand;
pub use self::documents::DocumentsCommand;
pub use self::workflows::WorkflowsCommand;
use crate::config::{Cli, create_assistant_service};

/// Whether a command modified the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to persist.
    Unchanged,
    /// The workspace must be printed or saved.
    Changed,
}

/// Top-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Browse and upload documents
    #[command(subcommand)]
    Documents(DocumentsCommand),

    /// Inspect and manage workflows
    #[command(subcommand)]
    Workflows(WorkflowsCommand),

    /// Summarize or question a document with the AI assistant
    #[command(subcommand)]
    Assistant(AssistantCommand),
}

/// Runs the selected command against `workspace`, writing results to `out`.
pub async fn execute(
    cli: &Cli,
    workspace: &mut Workspace,
    out: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    match &cli.command {
        Command::Documents(command) => documents::run(command, workspace, out),
        Command::Workflows(command) => workflows::run(command, workspace, out),
        Command::Assistant(command) => {
            let service = create_assistant_service(cli)?;
            assistant::run(command, &service, out).await?;
            Ok(Outcome::Unchanged)
        }
    }
}

/// Reads a file from disk as an upload.
pub(crate) fn read_upload(path: &Path, mime: Option<&str>) -> anyhow::Result<UploadedFile> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} is not a file", path.display()))?;
    let mime = mime.map_or_else(|| guess_mime(path).to_owned(), str::to_owned);

    Ok(UploadedFile::new(name, mime, bytes))
}

/// MIME type from the file extension.
fn guess_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("html" | "htm") => "text/html",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("a/Contract.PDF")), "application/pdf");
        assert_eq!(guess_mime(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_read_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        fs::write(&path, b"%PDF-1.7").unwrap();

        let upload = read_upload(&path, None).unwrap();
        assert_eq!(upload.name, "invoice.pdf");
        assert_eq!(upload.mime_type, "application/pdf");
        assert_eq!(upload.bytes.len(), 8);

        let upload = read_upload(&path, Some("text/plain")).unwrap();
        assert_eq!(upload.mime_type, "text/plain");
    }
}
