//! Editable workflow drafts.

use super::{ActionKind, TriggerKind, Workflow, WorkflowStep};
use crate::{Result, StepId, WorkflowId};

/// Name given to a workflow created from scratch.
pub const DEFAULT_WORKFLOW_NAME: &str = "New workflow";

/// A workflow being edited in the builder.
///
/// The draft is detached from the store: nothing changes until the built
/// workflow is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDraft {
    id: WorkflowId,
    existing: bool,
    name: String,
    trigger: TriggerKind,
    steps: Vec<WorkflowStep>,
    run_count: u64,
}

impl WorkflowDraft {
    /// Starts an empty draft for a new workflow.
    pub fn new() -> Self {
        Self {
            id: WorkflowId::new(),
            existing: false,
            name: DEFAULT_WORKFLOW_NAME.to_owned(),
            trigger: TriggerKind::default(),
            steps: Vec::new(),
            run_count: 0,
        }
    }

    /// Starts a draft that edits `workflow`.
    pub fn edit(workflow: &Workflow) -> Self {
        Self {
            id: workflow.id,
            existing: true,
            name: workflow.name.clone(),
            trigger: workflow.trigger,
            steps: workflow.steps.clone(),
            run_count: workflow.run_count,
        }
    }

    /// Identifier the built workflow will carry.
    pub fn id(&self) -> WorkflowId {
        self.id
    }

    /// Identifier of the workflow being edited, if any.
    pub fn editing(&self) -> Option<WorkflowId> {
        self.existing.then_some(self.id)
    }

    /// Current name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current trigger.
    pub fn trigger(&self) -> TriggerKind {
        self.trigger
    }

    /// Current steps in order.
    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    /// Renames the workflow.
    pub fn rename(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Changes the trigger.
    pub fn set_trigger(&mut self, trigger: TriggerKind) -> &mut Self {
        self.trigger = trigger;
        self
    }

    /// Appends a step for `action` and returns its identifier.
    pub fn add_step(&mut self, action: ActionKind) -> StepId {
        let step = WorkflowStep::new(action);
        let id = step.id;
        self.steps.push(step);
        id
    }

    /// Removes a step. Returns `false` if no step had that identifier.
    pub fn remove_step(&mut self, id: StepId) -> bool {
        let before = self.steps.len();
        self.steps.retain(|s| s.id != id);
        self.steps.len() != before
    }

    /// Produces the validated workflow.
    ///
    /// Saved workflows are always active, keep their identifier and run
    /// counter, and describe themselves by step count. Building the same
    /// draft twice yields the same identifier.
    pub fn build(&self) -> Result<Workflow> {
        let workflow = Workflow {
            id: self.id,
            name: self.name.clone(),
            description: format!("Workflow with {} steps", self.steps.len()),
            active: true,
            trigger: self.trigger,
            steps: self.steps.clone(),
            run_count: self.run_count,
            last_run_at: None,
        };
        workflow.validate()?;
        Ok(workflow)
    }
}

impl Default for WorkflowDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_defaults() {
        let draft = WorkflowDraft::new();
        assert_eq!(draft.name(), DEFAULT_WORKFLOW_NAME);
        assert_eq!(draft.trigger(), TriggerKind::OnUpload);
        assert!(draft.steps().is_empty());
        assert!(draft.editing().is_none());
    }

    #[test]
    fn test_build_new_workflow() {
        let mut draft = WorkflowDraft::new();
        draft.rename("Invoice extraction").set_trigger(TriggerKind::Manual);
        draft.add_step(ActionKind::Extract);
        draft.add_step(ActionKind::ConvertToText);

        let workflow = draft.build().unwrap();
        assert_eq!(workflow.name, "Invoice extraction");
        assert_eq!(workflow.description, "Workflow with 2 steps");
        assert!(workflow.active);
        assert_eq!(workflow.run_count, 0);
        assert_eq!(workflow.steps[0].name, ActionKind::Extract.label());
    }

    #[test]
    fn test_edit_keeps_identity_and_counter() {
        let original = Workflow::new("Contracts", TriggerKind::OnUpload)
            .with_active(false)
            .with_run_count(42);

        let mut draft = WorkflowDraft::edit(&original);
        draft.add_step(ActionKind::Summarize);
        let saved = draft.build().unwrap();

        assert_eq!(saved.id, original.id);
        assert_eq!(saved.run_count, 42);
        assert!(saved.active);
        assert_eq!(saved.steps.len(), 1);
    }

    #[test]
    fn test_new_draft_builds_stable_id() {
        let draft = WorkflowDraft::new();
        let first = draft.build().unwrap();
        let second = draft.build().unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.id, draft.id());
    }

    #[test]
    fn test_remove_step() {
        let mut draft = WorkflowDraft::new();
        let first = draft.add_step(ActionKind::Merge);
        let second = draft.add_step(ActionKind::Split);

        assert!(draft.remove_step(first));
        assert!(!draft.remove_step(first));
        assert_eq!(draft.steps().len(), 1);
        assert_eq!(draft.steps()[0].id, second);
    }

    #[test]
    fn test_rapidly_added_steps_have_unique_ids() {
        let mut draft = WorkflowDraft::new();
        for _ in 0..100 {
            draft.add_step(ActionKind::Watermark);
        }
        assert!(draft.build().is_ok());
    }

    #[test]
    fn test_blank_name_fails_to_build() {
        let mut draft = WorkflowDraft::new();
        draft.rename("");
        assert!(draft.build().is_err());
    }
}
