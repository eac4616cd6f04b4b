#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! # Docflow Core
//!
//! Pure, synchronous building blocks of the docflow document manager: the
//! document model and its filter engine, workflow definitions and their
//! copy-on-write store, run history aggregation, and the explicit state
//! machines that replace view-level flags.

/// Tracing target for the document filter engine.
pub const TRACING_TARGET_FILTER: &str = "docflow_core::filter";

/// Tracing target for workflow store updates.
pub const TRACING_TARGET_STORE: &str = "docflow_core::store";

/// Tracing target for navigation and uploads.
pub const TRACING_TARGET_WORKSPACE: &str = "docflow_core::workspace";

/// Tracing target for workflow dashboard transitions.
pub const TRACING_TARGET_DASHBOARD: &str = "docflow_core::dashboard";

mod error;
mod id;

pub mod dashboard;
pub mod document;
pub mod filter;
pub mod prelude;
pub mod run;
pub mod workflow;
pub mod workspace;

pub use dashboard::{DashboardState, HistoryView};
pub use document::{
    BYTES_PER_MB, Document, DocumentBuilder, DocumentContent, DocumentStatus, Tags, UPLOAD_TAG,
    UploadedFile,
};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use filter::{DocumentFilter, TagIndex, distinct_tags, filter};
pub use id::{DocumentId, MessageId, RunId, StepId, WorkflowId};
pub use run::{RunStats, RunStatus, WorkflowRun, runs_for, stats};
pub use workflow::{ActionKind, TriggerKind, Workflow, WorkflowDraft, WorkflowStep, WorkflowStore};
pub use workspace::{ViewState, Workspace, WorkspaceSnapshot};
