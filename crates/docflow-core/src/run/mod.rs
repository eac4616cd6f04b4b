//! Workflow execution records.

mod ledger;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

pub use self::ledger::{RunStats, runs_for, stats};
use crate::{RunId, WorkflowId};

/// Outcome of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    /// Completed without errors.
    Success,
    /// Failed.
    Error,
    /// Still executing.
    Running,
}

impl RunStatus {
    /// Returns whether the run succeeded.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// One historical execution of a workflow.
///
/// Runs are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRun {
    /// Unique identifier.
    pub id: RunId,
    /// Workflow this run belongs to.
    pub workflow_id: WorkflowId,
    /// When the run started.
    pub started_at: Timestamp,
    /// Outcome.
    pub status: RunStatus,
    /// Display duration, e.g. `4.2s`.
    pub duration: String,
    /// Free-text details.
    #[serde(default)]
    pub details: String,
    /// What started the run, e.g. `Manual`.
    pub triggered_by: String,
}

impl WorkflowRun {
    /// Creates a run record with a fresh identifier.
    pub fn new(workflow_id: WorkflowId, started_at: Timestamp, status: RunStatus) -> Self {
        Self {
            id: RunId::new(),
            workflow_id,
            started_at,
            status,
            duration: String::new(),
            details: String::new(),
            triggered_by: String::new(),
        }
    }

    /// Sets the display duration.
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Sets the details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Sets the trigger source label.
    pub fn with_triggered_by(mut self, triggered_by: impl Into<String>) -> Self {
        self.triggered_by = triggered_by.into();
        self
    }
}
