//! Workflow collection updates.
//!
//! Collections are never mutated in place: each update yields a new vector and
//! readers holding the previous snapshot keep seeing it unchanged.

use std::sync::Arc;

use super::Workflow;
use crate::{Error, Result, TRACING_TARGET_STORE, WorkflowId};

/// Replaces the workflow with the same identifier, or appends it.
pub fn upsert(workflows: &[Workflow], workflow: Workflow) -> Vec<Workflow> {
    let mut next = workflows.to_vec();
    match next.iter_mut().find(|w| w.id == workflow.id) {
        Some(slot) => *slot = workflow,
        None => next.push(workflow),
    }
    next
}

/// Flips the `active` flag of one workflow.
///
/// An unknown identifier yields an equal copy of the input.
pub fn toggle_active(workflows: &[Workflow], id: WorkflowId) -> Vec<Workflow> {
    let mut next = workflows.to_vec();
    match next.iter_mut().find(|w| w.id == id) {
        Some(workflow) => workflow.active = !workflow.active,
        None => {
            tracing::warn!(
                target: TRACING_TARGET_STORE,
                workflow_id = %id,
                "toggle requested for unknown workflow"
            );
        }
    }
    next
}

/// Snapshot-based workflow collection.
#[derive(Debug, Clone, Default)]
pub struct WorkflowStore {
    workflows: Arc<Vec<Workflow>>,
}

impl WorkflowStore {
    /// Creates a store from an initial collection.
    pub fn new(workflows: Vec<Workflow>) -> Self {
        Self {
            workflows: Arc::new(workflows),
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<Vec<Workflow>> {
        Arc::clone(&self.workflows)
    }

    /// Iterates the current workflows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Workflow> {
        self.workflows.iter()
    }

    /// Number of workflows.
    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    /// Returns whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    /// Looks up a workflow.
    pub fn get(&self, id: WorkflowId) -> Result<&Workflow> {
        self.workflows
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::not_found().with_message(format!("workflow {id} not found")))
    }

    /// Validates and upserts a workflow.
    pub fn save(&mut self, workflow: Workflow) -> Result<()> {
        workflow.validate()?;

        tracing::debug!(
            target: TRACING_TARGET_STORE,
            workflow_id = %workflow.id,
            steps = workflow.steps.len(),
            "saving workflow"
        );

        self.workflows = Arc::new(upsert(&self.workflows, workflow));
        Ok(())
    }

    /// Flips the active flag of a workflow and returns its new value.
    ///
    /// An unknown identifier leaves the snapshot untouched and yields `None`.
    pub fn toggle_active(&mut self, id: WorkflowId) -> Option<bool> {
        let next = toggle_active(&self.workflows, id);
        let active = next.iter().find(|w| w.id == id)?.active;
        self.workflows = Arc::new(next);
        Some(active)
    }
}

impl From<Vec<Workflow>> for WorkflowStore {
    fn from(workflows: Vec<Workflow>) -> Self {
        Self::new(workflows)
    }
}
