//! `docflow workflows ...`

use std::io::Write;

use clap::Subcommand;
use docflow_core::{ActionKind, HistoryView, TriggerKind, WorkflowId, Workspace};

use super::Outcome;
use crate::TRACING_TARGET_COMMAND;

/// Workflow commands.
#[derive(Debug, Clone, Subcommand)]
pub enum WorkflowsCommand {
    /// List every workflow
    List,

    /// Show the run history of a workflow, most recent first
    History {
        /// Workflow identifier
        id: WorkflowId,
    },

    /// Arm or disarm a workflow
    Toggle {
        /// Workflow identifier
        id: WorkflowId,
    },

    /// Create a workflow
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// on_upload, on_schedule or manual
        #[arg(long, default_value = "on_upload")]
        trigger: TriggerKind,

        /// Step actions in order: summarize, extract, merge, split, watermark, convert_to_text
        #[arg(long = "step", value_name = "ACTION")]
        steps: Vec<ActionKind>,
    },
}

pub(super) fn run(
    command: &WorkflowsCommand,
    workspace: &mut Workspace,
    out: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    match command {
        WorkflowsCommand::List => {
            list(workspace, out)?;
            Ok(Outcome::Unchanged)
        }
        WorkflowsCommand::History { id } => {
            {
                let (dashboard, store) = workspace.dashboard_mut();
                dashboard.select(store, *id)?;
            }
            let view = workspace
                .dashboard()
                .history_view(workspace.workflows(), workspace.runs())?;
            if let Some(view) = view {
                history(&view, out)?;
            }
            Ok(Outcome::Unchanged)
        }
        WorkflowsCommand::Toggle { id } => {
            let Some(active) = workspace.workflows_mut().toggle_active(*id) else {
                writeln!(out, "No workflow with id {id}; nothing changed.")?;
                return Ok(Outcome::Unchanged);
            };
            tracing::info!(
                target: TRACING_TARGET_COMMAND,
                workflow_id = %id,
                active,
                "Workflow toggled"
            );
            Ok(Outcome::Changed)
        }
        WorkflowsCommand::Create {
            name,
            trigger,
            steps,
        } => {
            let (dashboard, store) = workspace.dashboard_mut();
            let mut draft = dashboard.create_new();
            draft.rename(name.as_str()).set_trigger(*trigger);
            for action in steps {
                draft.add_step(*action);
            }

            let workflow = draft.build()?;
            let id = workflow.id;
            dashboard.save(store, workflow)?;

            tracing::info!(
                target: TRACING_TARGET_COMMAND,
                workflow_id = %id,
                steps = steps.len(),
                "Workflow created"
            );
            Ok(Outcome::Changed)
        }
    }
}

fn list(workspace: &Workspace, out: &mut dyn Write) -> anyhow::Result<()> {
    if workspace.workflows().is_empty() {
        writeln!(out, "No workflows defined.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<36}  {:<28}  {:<11}  {:<8}  {:>5}  {:>5}",
        "ID", "NAME", "TRIGGER", "STATE", "STEPS", "RUNS"
    )?;
    for workflow in workspace.workflows().iter() {
        writeln!(
            out,
            "{:<36}  {:<28}  {:<11}  {:<8}  {:>5}  {:>5}",
            workflow.id.to_string(),
            workflow.name,
            workflow.trigger.label(),
            if workflow.active { "active" } else { "paused" },
            workflow.steps.len(),
            workflow.run_count
        )?;
    }
    Ok(())
}

fn history(view: &HistoryView<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    let workflow = view.workflow;
    writeln!(out, "{} ({})", workflow.name, workflow.trigger.label())?;
    if !workflow.description.is_empty() {
        writeln!(out, "{}", workflow.description)?;
    }
    for (position, step) in workflow.steps.iter().enumerate() {
        writeln!(out, "  {}. {} [{}]", position + 1, step.name, step.action)?;
    }

    let last_run = view
        .stats
        .last_run_at
        .map(|at| at.strftime("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_owned());
    writeln!(out)?;
    writeln!(
        out,
        "Runs: {}  Success rate: {}%  Last run: {}",
        view.stats.total, view.stats.success_rate, last_run
    )?;

    if view.runs.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    for run in &view.runs {
        writeln!(
            out,
            "{}  {:<8}  {:>8}  {:<14}  {}",
            run.started_at.strftime("%Y-%m-%d %H:%M"),
            run.status.to_string(),
            run.duration,
            run.triggered_by,
            run.details
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use docflow_core::ErrorKind;

    use super::*;
    use crate::seed::{CONTRACTS_WORKFLOW, INVOICES_WORKFLOW};
    use crate::state::load_workspace;

    fn output(command: WorkflowsCommand, workspace: &mut Workspace) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = run(&command, workspace, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_list() {
        let mut workspace = load_workspace(None).unwrap();
        let (_, text) = output(WorkflowsCommand::List, &mut workspace);
        assert!(text.contains("Legal contract analysis"));
        assert!(text.contains("paused"));
    }

    #[test]
    fn test_history_newest_first() {
        let mut workspace = load_workspace(None).unwrap();
        let (_, text) = output(
            WorkflowsCommand::History {
                id: CONTRACTS_WORKFLOW,
            },
            &mut workspace,
        );

        assert!(text.contains("Runs: 3  Success rate: 67%  Last run: 2023-11-05 10:30"));
        let first = text.find("2023-11-05 10:30  success").unwrap();
        let second = text.find("2023-11-05 09:15").unwrap();
        let third = text.find("2023-11-04 16:45").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_history_unknown_workflow() {
        let mut workspace = load_workspace(None).unwrap();
        let mut out = Vec::new();
        let err = run(
            &WorkflowsCommand::History {
                id: WorkflowId::new(),
            },
            &mut workspace,
            &mut out,
        )
        .unwrap_err();

        let err = err.downcast::<docflow_core::Error>().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_toggle() {
        let mut workspace = load_workspace(None).unwrap();
        let (outcome, _) = output(
            WorkflowsCommand::Toggle {
                id: INVOICES_WORKFLOW,
            },
            &mut workspace,
        );
        assert_eq!(outcome, Outcome::Changed);
        assert!(workspace.workflows().get(INVOICES_WORKFLOW).unwrap().active);
    }

    #[test]
    fn test_toggle_unknown_is_unchanged() {
        let mut workspace = load_workspace(None).unwrap();
        let before = workspace.snapshot();
        let (outcome, text) = output(
            WorkflowsCommand::Toggle {
                id: WorkflowId::new(),
            },
            &mut workspace,
        );
        assert_eq!(outcome, Outcome::Unchanged);
        assert!(text.contains("nothing changed"));
        assert_eq!(workspace.snapshot(), before);
    }

    #[test]
    fn test_create() {
        let mut workspace = load_workspace(None).unwrap();
        let (outcome, _) = output(
            WorkflowsCommand::Create {
                name: "Monthly reports".into(),
                trigger: TriggerKind::OnSchedule,
                steps: vec![ActionKind::Merge, ActionKind::Watermark],
            },
            &mut workspace,
        );

        assert_eq!(outcome, Outcome::Changed);
        let created = workspace.workflows().iter().last().unwrap();
        assert_eq!(created.name, "Monthly reports");
        assert_eq!(created.description, "Workflow with 2 steps");
        assert_eq!(created.steps[1].action, ActionKind::Watermark);
    }
}
