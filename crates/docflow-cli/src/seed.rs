//! Built-in demo workspace.

use docflow_core::{
    ActionKind, Document, DocumentId, DocumentStatus, RunId, RunStatus, StepId, Tags, TriggerKind,
    Workflow, WorkflowId, WorkflowRun, WorkflowStep, WorkspaceSnapshot,
};

/// Identifier of the contract analysis demo workflow.
pub const CONTRACTS_WORKFLOW: WorkflowId = WorkflowId::from_u128(1);

/// Identifier of the invoice extraction demo workflow.
pub const INVOICES_WORKFLOW: WorkflowId = WorkflowId::from_u128(2);

const TRIGGER_UPLOAD: &str = "Auto (Upload)";
const TRIGGER_MANUAL: &str = "Manual";

/// Two documents, two workflows and four runs.
pub fn demo_snapshot() -> anyhow::Result<WorkspaceSnapshot> {
    let documents = vec![
        Document::builder()
            .with_id(DocumentId::from_u128(1))
            .with_name("Service_Agreement_2024.pdf")
            .with_size(2_621_440u64)
            .with_uploaded_at("2023-10-15T00:00:00Z".parse::<jiff::Timestamp>()?)
            .with_status(DocumentStatus::Ready)
            .with_tags(Tags::from_strings(["Legal", "Contracts"]))
            .build()?,
        Document::builder()
            .with_id(DocumentId::from_u128(2))
            .with_name("Financial_Report_Q3.pdf")
            .with_size(4_404_019u64)
            .with_uploaded_at("2023-11-02T00:00:00Z".parse::<jiff::Timestamp>()?)
            .with_status(DocumentStatus::Ready)
            .with_tags(Tags::from_strings(["Finance", "Report"]))
            .build()?,
    ];

    let contracts = Workflow {
        id: CONTRACTS_WORKFLOW,
        name: "Legal contract analysis".into(),
        description: "Summarize every uploaded contract and stamp a watermark.".into(),
        active: true,
        trigger: TriggerKind::OnUpload,
        steps: vec![
            WorkflowStep {
                id: StepId::from_u128(101),
                ..WorkflowStep::new(ActionKind::Summarize).with_name("AI analysis")
            },
            WorkflowStep {
                id: StepId::from_u128(102),
                ..WorkflowStep::new(ActionKind::Watermark).with_name("Watermark \"CONFIDENTIAL\"")
            },
        ],
        run_count: 42,
        last_run_at: None,
    };

    let invoices = Workflow {
        id: INVOICES_WORKFLOW,
        name: "Invoice extraction".into(),
        description: "Extract key fields from invoices and convert them to JSON.".into(),
        active: false,
        trigger: TriggerKind::Manual,
        steps: vec![WorkflowStep {
            id: StepId::from_u128(201),
            ..WorkflowStep::new(ActionKind::Extract).with_name("Extract data")
        }],
        run_count: 15,
        last_run_at: None,
    };

    let runs = vec![
        run(1, CONTRACTS_WORKFLOW, "2023-11-05T10:30:00Z", RunStatus::Success)?
            .with_duration("4.2s")
            .with_details("Processed Contract_A.pdf. Summary generated.")
            .with_triggered_by(TRIGGER_UPLOAD),
        run(2, CONTRACTS_WORKFLOW, "2023-11-05T09:15:00Z", RunStatus::Success)?
            .with_duration("3.8s")
            .with_details("Processed NDA_Rossi.pdf.")
            .with_triggered_by(TRIGGER_UPLOAD),
        run(3, CONTRACTS_WORKFLOW, "2023-11-04T16:45:00Z", RunStatus::Error)?
            .with_duration("1.2s")
            .with_details("Gemini API error: Quota exceeded.")
            .with_triggered_by(TRIGGER_UPLOAD),
        run(4, INVOICES_WORKFLOW, "2023-11-06T11:00:00Z", RunStatus::Running)?
            .with_duration("Pending")
            .with_details("Processing a batch of 5 invoices...")
            .with_triggered_by(TRIGGER_MANUAL),
    ];

    Ok(WorkspaceSnapshot {
        documents,
        workflows: vec![contracts, invoices],
        runs,
    })
}

fn run(
    id: u128,
    workflow_id: WorkflowId,
    started_at: &str,
    status: RunStatus,
) -> anyhow::Result<WorkflowRun> {
    Ok(WorkflowRun {
        id: RunId::from_u128(id),
        ..WorkflowRun::new(workflow_id, started_at.parse()?, status)
    })
}
