//! Workflow dashboard state machine.

use serde::{Deserialize, Serialize};

use crate::run::{RunStats, WorkflowRun, runs_for, stats};
use crate::workflow::{Workflow, WorkflowDraft, WorkflowStore};
use crate::{Error, Result, TRACING_TARGET_DASHBOARD, WorkflowId};

/// Which panel of the workflow dashboard is showing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardState {
    /// Every workflow as a card.
    #[default]
    Grid,
    /// Run history of one workflow.
    History {
        /// The selected workflow.
        workflow: WorkflowId,
    },
    /// Creating or editing a workflow.
    Builder {
        /// The workflow being edited, `None` for a new one.
        editing: Option<WorkflowId>,
    },
}

/// Everything shown by the history panel.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView<'a> {
    /// The selected workflow.
    pub workflow: &'a Workflow,
    /// Its runs, most recent first.
    pub runs: Vec<&'a WorkflowRun>,
    /// Statistics over `runs`.
    pub stats: RunStats,
}

impl DashboardState {
    /// Opens the builder for a new workflow.
    pub fn create_new(&mut self) -> WorkflowDraft {
        self.transition(Self::Builder { editing: None });
        WorkflowDraft::new()
    }

    /// Shows the history of `id`.
    pub fn select(&mut self, store: &WorkflowStore, id: WorkflowId) -> Result<()> {
        store.get(id)?;
        self.transition(Self::History { workflow: id });
        Ok(())
    }

    /// Opens the builder on the workflow whose history is showing.
    pub fn edit(&mut self, store: &WorkflowStore) -> Result<WorkflowDraft> {
        let Self::History { workflow } = *self else {
            return Err(Error::invalid_input()
                .with_message("a workflow must be selected before it can be edited"));
        };

        let draft = WorkflowDraft::edit(store.get(workflow)?);
        self.transition(Self::Builder {
            editing: Some(workflow),
        });
        Ok(draft)
    }

    /// Stores the workflow built from the builder and returns to the grid.
    ///
    /// An edit must keep the identifier of the workflow being edited, and a
    /// new workflow must not reuse an identifier already in the store.
    pub fn save(&mut self, store: &mut WorkflowStore, workflow: Workflow) -> Result<()> {
        let Self::Builder { editing } = *self else {
            return Err(Error::invalid_input().with_message("the builder is not open"));
        };

        match editing {
            Some(id) if id != workflow.id => {
                return Err(Error::invalid_input().with_message(format!(
                    "builder is editing workflow {id}, not {}",
                    workflow.id
                )));
            }
            None if store.get(workflow.id).is_ok() => {
                return Err(Error::conflict()
                    .with_message(format!("workflow {} already exists", workflow.id)));
            }
            _ => {}
        }

        store.save(workflow)?;
        self.transition(Self::Grid);
        Ok(())
    }

    /// Leaves the current panel without saving.
    pub fn cancel(&mut self) {
        let next = match *self {
            Self::Builder {
                editing: Some(workflow),
            } => Self::History { workflow },
            _ => Self::Grid,
        };
        self.transition(next);
    }

    /// Collects the history panel contents, or `None` outside `History`.
    pub fn history_view<'a>(
        &self,
        store: &'a WorkflowStore,
        runs: &'a [WorkflowRun],
    ) -> Result<Option<HistoryView<'a>>> {
        let Self::History { workflow } = *self else {
            return Ok(None);
        };

        let workflow = store.get(workflow)?;
        let runs = runs_for(runs, workflow.id);
        let stats = stats(&runs);
        Ok(Some(HistoryView {
            workflow,
            runs,
            stats,
        }))
    }

    fn transition(&mut self, next: Self) {
        tracing::debug!(
            target: TRACING_TARGET_DASHBOARD,
            from = ?self,
            to = ?next,
            "dashboard transition"
        );
        *self = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionKind, ErrorKind, RunStatus, TriggerKind};

    fn store() -> WorkflowStore {
        WorkflowStore::new(vec![
            Workflow::new("Contracts", TriggerKind::OnUpload).with_run_count(42),
            Workflow::new("Invoices", TriggerKind::Manual).with_active(false),
        ])
    }

    #[test]
    fn test_create_save_returns_to_grid() {
        let mut store = store();
        let mut state = DashboardState::default();

        let mut draft = state.create_new();
        assert_eq!(state, DashboardState::Builder { editing: None });

        draft.add_step(ActionKind::Summarize);
        state.save(&mut store, draft.build().unwrap()).unwrap();

        assert_eq!(state, DashboardState::Grid);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_select_edit_cancel_returns_to_history() {
        let store = store();
        let id = store.snapshot()[0].id;
        let mut state = DashboardState::Grid;

        state.select(&store, id).unwrap();
        let draft = state.edit(&store).unwrap();
        assert_eq!(draft.editing(), Some(id));
        assert_eq!(state, DashboardState::Builder { editing: Some(id) });

        state.cancel();
        assert_eq!(state, DashboardState::History { workflow: id });

        state.cancel();
        assert_eq!(state, DashboardState::Grid);
    }

    #[test]
    fn test_cancel_new_returns_to_grid() {
        let mut state = DashboardState::Grid;
        state.create_new();
        state.cancel();
        assert_eq!(state, DashboardState::Grid);
    }

    #[test]
    fn test_select_unknown_keeps_state() {
        let mut state = DashboardState::Grid;
        let err = state.select(&store(), WorkflowId::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(state, DashboardState::Grid);
    }

    #[test]
    fn test_edit_requires_selection() {
        let mut state = DashboardState::Grid;
        assert_eq!(
            state.edit(&store()).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_save_outside_builder_fails() {
        let mut store = store();
        let mut state = DashboardState::Grid;
        let workflow = Workflow::new("Reports", TriggerKind::Manual);
        assert!(state.save(&mut store, workflow).is_err());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_save_rejects_other_workflow_while_editing() {
        let mut store = store();
        let id = store.snapshot()[0].id;
        let mut state = DashboardState::Grid;

        state.select(&store, id).unwrap();
        state.edit(&store).unwrap();
        let other = WorkflowDraft::new().build().unwrap();

        let err = state.save(&mut store, other).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(state, DashboardState::Builder { editing: Some(id) });
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_save_new_rejects_existing_id() {
        let mut store = store();
        let existing = store.snapshot()[1].clone();
        let mut state = DashboardState::Grid;
        state.create_new();

        let err = state.save(&mut store, existing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_history_view() {
        let store = store();
        let id = store.snapshot()[0].id;
        let runs = vec![
            WorkflowRun::new(id, "2023-11-04T16:45:00Z".parse().unwrap(), RunStatus::Error),
            WorkflowRun::new(id, "2023-11-05T10:30:00Z".parse().unwrap(), RunStatus::Success),
        ];

        let mut state = DashboardState::Grid;
        assert!(state.history_view(&store, &runs).unwrap().is_none());

        state.select(&store, id).unwrap();
        let view = state.history_view(&store, &runs).unwrap().unwrap();
        assert_eq!(view.workflow.name, "Contracts");
        assert_eq!(view.runs[0].status, RunStatus::Success);
        assert_eq!(view.stats.success_rate, 50);
    }
}
