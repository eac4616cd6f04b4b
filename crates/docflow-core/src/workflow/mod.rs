//! Workflow definitions.
//!
//! A workflow pairs a [`TriggerKind`] with an ordered list of [`WorkflowStep`]s.
//! Definitions are plain data: nothing in this crate executes them.

mod draft;
mod store;

use std::collections::{BTreeMap, HashSet};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

pub use self::draft::{DEFAULT_WORKFLOW_NAME, WorkflowDraft};
pub use self::store::{WorkflowStore, toggle_active, upsert};
use crate::{Error, Result, StepId, WorkflowId};

/// The event class that starts a workflow.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TriggerKind {
    /// Runs whenever a document is uploaded.
    #[default]
    OnUpload,
    /// Runs on a schedule.
    OnSchedule,
    /// Runs only when started by a user.
    Manual,
}

impl TriggerKind {
    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::OnUpload => "On upload",
            Self::OnSchedule => "On schedule",
            Self::Manual => "Manual",
        }
    }

    /// Returns whether the workflow starts without user action.
    #[inline]
    pub fn is_automatic(self) -> bool {
        matches!(self, Self::OnUpload | Self::OnSchedule)
    }
}

/// The action a single step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    /// AI summary of the document.
    Summarize,
    /// AI extraction of key fields.
    Extract,
    /// Merge with other recent documents.
    Merge,
    /// Split every page into its own file.
    Split,
    /// Stamp a watermark.
    Watermark,
    /// Convert into an editable text document.
    ConvertToText,
}

impl ActionKind {
    /// Default display name for a new step of this kind.
    pub fn label(self) -> &'static str {
        match self {
            Self::Summarize => "Generate AI summary",
            Self::Extract => "Extract key data",
            Self::Merge => "Merge PDF",
            Self::Split => "Split PDF",
            Self::Watermark => "Apply watermark",
            Self::ConvertToText => "Convert to text",
        }
    }

    /// One line description shown in the action picker.
    pub fn description(self) -> &'static str {
        match self {
            Self::Summarize => "Analyze the content with the language model",
            Self::Extract => "Extract dates, amounts and names as JSON",
            Self::Merge => "Combine with other recent documents",
            Self::Split => "Separate every page into a new file",
            Self::Watermark => "Add a logo or a \"Confidential\" stamp",
            Self::ConvertToText => "Turn the PDF into an editable document",
        }
    }

    /// Returns whether the action calls the AI assistant.
    #[inline]
    pub fn uses_assistant(self) -> bool {
        matches!(self, Self::Summarize | Self::Extract)
    }
}

/// One atomic action within a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Identifier, unique within the workflow.
    pub id: StepId,
    /// What the step does.
    pub action: ActionKind,
    /// Display name.
    pub name: String,
    /// Step options; their meaning is up to the executor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, serde_json::Value>>,
}

impl WorkflowStep {
    /// Creates a step with a fresh identifier and the action's default label.
    pub fn new(action: ActionKind) -> Self {
        Self {
            id: StepId::new(),
            action,
            name: action.label().to_owned(),
            config: Some(BTreeMap::new()),
        }
    }

    /// Overrides the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets one configuration entry.
    pub fn with_config(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.config
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value);
        self
    }
}

/// A workflow definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique identifier.
    pub id: WorkflowId,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Whether the trigger is armed.
    pub active: bool,
    /// What starts the workflow.
    pub trigger: TriggerKind,
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
    /// Number of recorded runs; never decreases.
    #[serde(default)]
    pub run_count: u64,
    /// When the workflow last ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_at: Option<Timestamp>,
}

impl Workflow {
    /// Creates an active workflow without steps.
    pub fn new(name: impl Into<String>, trigger: TriggerKind) -> Self {
        Self {
            id: WorkflowId::new(),
            name: name.into(),
            description: String::new(),
            active: true,
            trigger,
            steps: Vec::new(),
            run_count: 0,
            last_run_at: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a step.
    pub fn with_step(mut self, step: WorkflowStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Sets the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Sets the run counter.
    pub fn with_run_count(mut self, run_count: u64) -> Self {
        self.run_count = run_count;
        self
    }

    /// Returns the step with the given identifier.
    pub fn step(&self, id: StepId) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Checks the structural invariants of the definition.
    ///
    /// - the name is not blank,
    /// - step identifiers are unique.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input().with_message("workflow name must not be empty"));
        }

        let mut seen = HashSet::with_capacity(self.steps.len());
        for step in &self.steps {
            if !seen.insert(step.id) {
                return Err(Error::invalid_input()
                    .with_message(format!("duplicate step identifier {}", step.id)));
            }
        }

        Ok(())
    }
}
