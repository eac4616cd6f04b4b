//! Application state shared by every view.

use std::collections::BTreeSet;
use std::sync::Arc;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardState;
use crate::filter::{DocumentFilter, TagIndex};
use crate::run::WorkflowRun;
use crate::workflow::{Workflow, WorkflowStore};
use crate::{Document, DocumentId, Error, Result, TRACING_TARGET_WORKSPACE, UploadedFile};

/// Top-level screen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", content = "document", rename_all = "snake_case")]
pub enum ViewState {
    /// Landing page.
    #[default]
    Landing,
    /// Document list with filters.
    Dashboard,
    /// One document with the assistant panel.
    DocumentDetail(DocumentId),
    /// Workflow dashboard.
    Workflows,
    /// Settings.
    Settings,
}

/// Serializable form of a [`Workspace`].
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    /// Documents, newest first.
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Workflow definitions.
    #[serde(default)]
    pub workflows: Vec<Workflow>,
    /// Run history.
    #[serde(default)]
    pub runs: Vec<WorkflowRun>,
}

/// Explicit application state.
///
/// Collections are replaced wholesale on change; snapshots handed out earlier
/// are never modified.
#[derive(Debug, Default)]
pub struct Workspace {
    documents: Arc<Vec<Document>>,
    workflows: WorkflowStore,
    runs: Arc<Vec<WorkflowRun>>,
    view: ViewState,
    dashboard: DashboardState,
    tag_index: TagIndex,
}

impl Workspace {
    /// Creates a workspace on the landing page.
    pub fn new(snapshot: WorkspaceSnapshot) -> Self {
        Self {
            documents: Arc::new(snapshot.documents),
            workflows: WorkflowStore::new(snapshot.workflows),
            runs: Arc::new(snapshot.runs),
            ..Self::default()
        }
    }

    /// Captures the current collections.
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            documents: self.documents.as_ref().clone(),
            workflows: self.workflows.snapshot().as_ref().clone(),
            runs: self.runs.as_ref().clone(),
        }
    }

    /// Current document snapshot.
    pub fn documents(&self) -> Arc<Vec<Document>> {
        Arc::clone(&self.documents)
    }

    /// Looks up a document.
    pub fn document(&self, id: DocumentId) -> Result<&Document> {
        self.documents
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::not_found().with_message(format!("document {id} not found")))
    }

    /// Workflow definitions.
    pub fn workflows(&self) -> &WorkflowStore {
        &self.workflows
    }

    /// Mutable access to the workflow definitions.
    pub fn workflows_mut(&mut self) -> &mut WorkflowStore {
        &mut self.workflows
    }

    /// Run history.
    pub fn runs(&self) -> &[WorkflowRun] {
        &self.runs
    }

    /// Current screen.
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Selected document, if a detail view is open.
    pub fn selected_document(&self) -> Option<&Document> {
        match self.view {
            ViewState::DocumentDetail(id) => self.documents.iter().find(|d| d.id == id),
            _ => None,
        }
    }

    /// Workflow dashboard state.
    pub fn dashboard(&self) -> &DashboardState {
        &self.dashboard
    }

    /// Workflow dashboard state together with the store it edits.
    pub fn dashboard_mut(&mut self) -> (&mut DashboardState, &mut WorkflowStore) {
        (&mut self.dashboard, &mut self.workflows)
    }

    /// Switches screen. Leaving a detail view drops the selection.
    ///
    /// Opening a detail view goes through [`Workspace::select_document`].
    pub fn navigate(&mut self, view: ViewState) -> Result<()> {
        if let ViewState::DocumentDetail(id) = view {
            return self.select_document(id);
        }

        tracing::debug!(target: TRACING_TARGET_WORKSPACE, from = ?self.view, to = ?view, "navigate");
        self.view = view;
        Ok(())
    }

    /// Opens the detail view of a document.
    pub fn select_document(&mut self, id: DocumentId) -> Result<()> {
        self.document(id)?;
        tracing::debug!(target: TRACING_TARGET_WORKSPACE, document_id = %id, "document selected");
        self.view = ViewState::DocumentDetail(id);
        Ok(())
    }

    /// Adds an uploaded file as the newest document and opens it.
    pub fn upload(&mut self, file: UploadedFile) -> Result<DocumentId> {
        let id = DocumentId::new();
        let document = file.into_document(id, Timestamp::now())?;

        tracing::info!(
            target: TRACING_TARGET_WORKSPACE,
            document_id = %id,
            name = %document.name,
            size = document.size,
            "document uploaded"
        );

        let mut next = Vec::with_capacity(self.documents.len() + 1);
        next.push(document);
        next.extend(self.documents.iter().cloned());
        self.documents = Arc::new(next);
        self.view = ViewState::DocumentDetail(id);
        Ok(id)
    }

    /// Stores a generated summary on a document.
    pub fn set_summary(&mut self, id: DocumentId, summary: impl Into<String>) -> Result<()> {
        self.document(id)?;
        let summary = summary.into();
        let next = self
            .documents
            .iter()
            .map(|d| {
                let mut d = d.clone();
                if d.id == id {
                    d.summary = Some(summary.clone());
                }
                d
            })
            .collect();
        self.documents = Arc::new(next);
        Ok(())
    }

    /// Documents passing `filter`, in collection order.
    pub fn filtered_documents(&self, filter: &DocumentFilter) -> Vec<Document> {
        filter.apply(&self.documents)
    }

    /// Distinct tags across all documents, recomputed only after a change.
    pub fn available_tags(&mut self) -> &BTreeSet<String> {
        self.tag_index.tags(&self.documents)
    }
}

impl From<WorkspaceSnapshot> for Workspace {
    fn from(snapshot: WorkspaceSnapshot) -> Self {
        Self::new(snapshot)
    }
}
