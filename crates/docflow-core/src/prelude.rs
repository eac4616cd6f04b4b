//! Convenient re-exports for common use.

pub use crate::dashboard::DashboardState;
pub use crate::document::{Document, DocumentContent, DocumentStatus, Tags, UploadedFile};
pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::filter::DocumentFilter;
pub use crate::id::{DocumentId, MessageId, RunId, StepId, WorkflowId};
pub use crate::run::{RunStats, RunStatus, WorkflowRun};
pub use crate::workflow::{ActionKind, TriggerKind, Workflow, WorkflowDraft, WorkflowStep};
pub use crate::workspace::{ViewState, Workspace, WorkspaceSnapshot};
