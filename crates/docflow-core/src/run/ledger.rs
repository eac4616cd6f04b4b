//! Read-only aggregation over run history.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::WorkflowRun;
use crate::WorkflowId;

/// Derived statistics for a sequence of runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Number of runs.
    pub total: usize,
    /// Whole percentage of successful runs, `0` when there are none.
    pub success_rate: u8,
    /// Start of the most recent run.
    pub last_run_at: Option<Timestamp>,
}

/// Returns the runs of `workflow_id`, most recent first.
///
/// Runs sharing a timestamp keep their input order.
pub fn runs_for(runs: &[WorkflowRun], workflow_id: WorkflowId) -> Vec<&WorkflowRun> {
    let mut selected: Vec<_> = runs
        .iter()
        .filter(|run| run.workflow_id == workflow_id)
        .collect();
    selected.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    selected
}

/// Computes statistics over `runs` in any order.
pub fn stats(runs: &[&WorkflowRun]) -> RunStats {
    let total = runs.len();
    if total == 0 {
        return RunStats::default();
    }

    let successes = runs.iter().filter(|run| run.status.is_success()).count();
    // Round half up in integers: floor(100 * s / t + 1/2).
    let rate = (200 * successes + total) / (2 * total);

    RunStats {
        total,
        success_rate: rate as u8,
        last_run_at: runs.iter().map(|run| run.started_at).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunStatus;

    fn run(workflow_id: WorkflowId, at: &str, status: RunStatus) -> WorkflowRun {
        WorkflowRun::new(workflow_id, at.parse().unwrap(), status)
    }

    #[test]
    fn test_stats_empty() {
        let stats = stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.success_rate, 0);
        assert!(stats.last_run_at.is_none());
    }

    #[test]
    fn test_stats_rounds_half_up() {
        let wf = WorkflowId::new();
        let runs = [
            run(wf, "2023-11-05T10:30:00Z", RunStatus::Success),
            run(wf, "2023-11-05T09:15:00Z", RunStatus::Success),
            run(wf, "2023-11-04T16:45:00Z", RunStatus::Error),
        ];
        let sorted = runs_for(&runs, wf);
        let stats = stats(&sorted);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.success_rate, 67);
        assert_eq!(
            stats.last_run_at,
            Some("2023-11-05T10:30:00Z".parse().unwrap())
        );
    }

    #[test]
    fn test_stats_last_run_ignores_order() {
        let wf = WorkflowId::new();
        let older = run(wf, "2023-11-04T16:45:00Z", RunStatus::Error);
        let newer = run(wf, "2023-11-05T10:30:00Z", RunStatus::Success);

        let stats = stats(&[&older, &newer]);
        assert_eq!(stats.success_rate, 50);
        assert_eq!(stats.last_run_at, Some(newer.started_at));
    }

    #[test]
    fn test_stats_exact_half() {
        let wf = WorkflowId::new();
        let runs = [
            run(wf, "2023-11-05T10:30:00Z", RunStatus::Success),
            run(wf, "2023-11-05T09:15:00Z", RunStatus::Error),
            run(wf, "2023-11-05T08:15:00Z", RunStatus::Error),
            run(wf, "2023-11-05T07:15:00Z", RunStatus::Running),
            run(wf, "2023-11-05T06:15:00Z", RunStatus::Running),
            run(wf, "2023-11-05T05:15:00Z", RunStatus::Running),
            run(wf, "2023-11-05T04:15:00Z", RunStatus::Running),
            run(wf, "2023-11-05T03:15:00Z", RunStatus::Running),
        ];
        // 1/8 = 12.5%
        assert_eq!(stats(&runs_for(&runs, wf)).success_rate, 13);
    }

    #[test]
    fn test_runs_for_sorts_descending() {
        let first = WorkflowId::new();
        let second = WorkflowId::new();
        let runs = [
            run(first, "2023-11-04T16:45:00Z", RunStatus::Error),
            run(second, "2023-11-06T11:00:00Z", RunStatus::Running),
            run(first, "2023-11-05T09:15:00Z", RunStatus::Success),
            run(first, "2023-11-05T10:30:00Z", RunStatus::Success),
        ];

        let order: Vec<_> = runs_for(&runs, first)
            .iter()
            .map(|r| r.started_at.to_string())
            .collect();
        assert_eq!(
            order,
            [
                "2023-11-05T10:30:00Z",
                "2023-11-05T09:15:00Z",
                "2023-11-04T16:45:00Z"
            ]
        );
    }

    #[test]
    fn test_runs_for_ties_keep_input_order() {
        let wf = WorkflowId::new();
        let a = run(wf, "2023-11-05T10:30:00Z", RunStatus::Success);
        let b = run(wf, "2023-11-05T10:30:00Z", RunStatus::Error);
        let runs = [a.clone(), b.clone()];

        let sorted = runs_for(&runs, wf);
        assert_eq!(sorted[0].id, a.id);
        assert_eq!(sorted[1].id, b.id);
    }

    #[test]
    fn test_runs_for_unknown_workflow() {
        let runs = [run(WorkflowId::new(), "2023-11-05T10:30:00Z", RunStatus::Success)];
        assert!(runs_for(&runs, WorkflowId::new()).is_empty());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(serde_json::from_str::<RunStatus>("\"cancelled\"").is_err());
    }
}
