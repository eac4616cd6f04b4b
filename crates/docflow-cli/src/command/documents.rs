//! `docflow documents ...`

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use docflow_core::{Document, DocumentFilter, Workspace};
use jiff::civil::Date;

use super::{Outcome, read_upload};
use crate::TRACING_TARGET_COMMAND;

/// Document commands.
#[derive(Debug, Clone, Subcommand)]
pub enum DocumentsCommand {
    /// List documents matching the filters
    List(ListArgs),

    /// Print every tag used by a document
    Tags,

    /// Add a file to the workspace
    Upload {
        /// File to upload
        path: PathBuf,

        /// MIME type; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
    },
}

/// Filters for `documents list`.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Case-insensitive part of the document name
    #[arg(long, short)]
    pub query: Option<String>,

    /// Keep documents carrying any of these tags
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Uploaded on or after this day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<Date>,

    /// Uploaded on or before this day (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<Date>,

    /// Minimum size in MB; ignored when not a number
    #[arg(long, value_name = "MB")]
    pub min_size: Option<String>,

    /// Maximum size in MB; ignored when not a number
    #[arg(long, value_name = "MB")]
    pub max_size: Option<String>,
}

impl ListArgs {
    /// Builds the filter described by the arguments.
    pub fn to_filter(&self) -> DocumentFilter {
        let mut filter = DocumentFilter::new().with_tags(self.tags.iter().cloned());

        if let Some(query) = &self.query {
            filter = filter.with_name_query(query.as_str());
        }
        if let Some(from) = self.from {
            filter = filter.with_date_from(from);
        }
        if let Some(to) = self.to {
            filter = filter.with_date_to(to);
        }
        if let Some(min) = &self.min_size {
            filter = filter.with_min_size_input(min);
        }
        if let Some(max) = &self.max_size {
            filter = filter.with_max_size_input(max);
        }

        filter
    }
}

pub(super) fn run(
    command: &DocumentsCommand,
    workspace: &mut Workspace,
    out: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    match command {
        DocumentsCommand::List(args) => {
            list(args, workspace, out)?;
            Ok(Outcome::Unchanged)
        }
        DocumentsCommand::Tags => {
            for tag in workspace.available_tags() {
                writeln!(out, "{tag}")?;
            }
            Ok(Outcome::Unchanged)
        }
        DocumentsCommand::Upload { path, mime } => {
            let upload = read_upload(path, mime.as_deref())?;
            let id = workspace.upload(upload)?;
            tracing::info!(
                target: TRACING_TARGET_COMMAND,
                document_id = %id,
                path = %path.display(),
                "Document added"
            );
            Ok(Outcome::Changed)
        }
    }
}

fn list(args: &ListArgs, workspace: &Workspace, out: &mut dyn Write) -> anyhow::Result<()> {
    let filter = args.to_filter();
    let total = workspace.documents().len();
    let documents = workspace.filtered_documents(&filter);

    if documents.is_empty() {
        if total == 0 {
            writeln!(out, "No documents in the workspace.")?;
        } else {
            writeln!(
                out,
                "No documents match the filters ({} active).",
                filter.active_filter_count()
            )?;
        }
        return Ok(());
    }

    writeln!(
        out,
        "{:<36}  {:<32}  {:>8}  {:<10}  {:<10}  TAGS",
        "ID", "NAME", "SIZE", "UPLOADED", "STATUS"
    )?;
    for document in &documents {
        write_row(out, document)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} of {} documents, {} active filters",
        documents.len(),
        total,
        filter.active_filter_count()
    )?;
    Ok(())
}

fn write_row(out: &mut dyn Write, document: &Document) -> std::io::Result<()> {
    let tags: Vec<&str> = document.tags.iter().collect();
    writeln!(
        out,
        "{:<36}  {:<32}  {:>5.1} MB  {:<10}  {:<10}  {}",
        document.id.to_string(),
        document.name,
        document.size_mb(),
        document.uploaded_at.strftime("%Y-%m-%d").to_string(),
        document.status.to_string(),
        tags.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use docflow_core::UPLOAD_TAG;

    use super::*;
    use crate::state::load_workspace;

    fn output(command: DocumentsCommand, workspace: &mut Workspace) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = run(&command, workspace, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_list_all() {
        let mut workspace = load_workspace(None).unwrap();
        let (_, text) = output(DocumentsCommand::List(ListArgs::default()), &mut workspace);
        assert!(text.contains("Service_Agreement_2024.pdf"));
        assert!(text.contains("Financial_Report_Q3.pdf"));
        assert!(text.contains("2 of 2 documents, 0 active filters"));
    }

    #[test]
    fn test_list_filtered() {
        let mut workspace = load_workspace(None).unwrap();
        let args = ListArgs {
            tags: vec!["Finance".into()],
            min_size: Some("four".into()),
            ..ListArgs::default()
        };
        let (_, text) = output(DocumentsCommand::List(args), &mut workspace);
        assert!(!text.contains("Service_Agreement_2024.pdf"));
        assert!(text.contains("1 of 2 documents, 1 active filters"));
    }

    #[test]
    fn test_list_no_match() {
        let mut workspace = load_workspace(None).unwrap();
        let args = ListArgs {
            query: Some("invoice".into()),
            ..ListArgs::default()
        };
        let (_, text) = output(DocumentsCommand::List(args), &mut workspace);
        assert!(text.starts_with("No documents match the filters"));
    }

    #[test]
    fn test_list_empty_workspace() {
        let mut workspace = Workspace::default();
        let (_, text) = output(DocumentsCommand::List(ListArgs::default()), &mut workspace);
        assert_eq!(text.trim(), "No documents in the workspace.");
    }

    #[test]
    fn test_tags() {
        let mut workspace = load_workspace(None).unwrap();
        let (_, text) = output(DocumentsCommand::Tags, &mut workspace);
        assert_eq!(text.lines().collect::<Vec<_>>(), ["Contracts", "Finance", "Legal", "Report"]);
    }

    #[test]
    fn test_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nda.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let mut workspace = load_workspace(None).unwrap();
        let (outcome, _) = output(
            DocumentsCommand::Upload { path, mime: None },
            &mut workspace,
        );

        assert_eq!(outcome, Outcome::Changed);
        let documents = workspace.documents();
        assert_eq!(documents.len(), 3);
        assert_eq!(documents[0].name, "nda.pdf");
        assert!(documents[0].tags.contains(UPLOAD_TAG));
    }
}
